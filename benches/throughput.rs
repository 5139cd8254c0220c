use criterion::{black_box, criterion_group, criterion_main, Criterion};
use http::{Method, Request};
use mango::context::{Context, Reply};
use mango::router::{RouteTree, Router};

fn routes() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/"),
        (Method::GET, "/zoo/animals"),
        (Method::POST, "/zoo/animals"),
        (Method::GET, "/zoo/animals/{id}"),
        (Method::PUT, "/zoo/animals/{id}"),
        (Method::PATCH, "/zoo/animals/{id}"),
        (Method::DELETE, "/zoo/animals/{id}"),
        (Method::GET, "/zoo/animals/{id}/toys/{toy_id}"),
        (
            Method::GET,
            "/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}",
        ),
        (
            Method::POST,
            "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}",
        ),
        (Method::GET, "/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}"),
        (Method::GET, "/zoo/health"),
    ]
}

fn test_paths() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/zoo/animals/123"),
        (Method::GET, "/zoo/animals/123/toys/456"),
        (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
        (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
    ]
}

fn bench_route_resolution(c: &mut Criterion) {
    let mut tree = RouteTree::new();
    for (i, (method, pattern)) in routes().into_iter().enumerate() {
        tree.insert(method, pattern, i).unwrap();
    }
    let test_paths = test_paths();
    c.bench_function("route_resolve", |b| {
        b.iter(|| {
            for (method, path) in &test_paths {
                let handler = tree.resolve(path).and_then(|r| r.get(method).copied());
                black_box(handler);
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let mut router = Router::new();
    for (method, pattern) in routes() {
        router
            .handle(method, pattern, |ctx: &mut Context| {
                let params = ctx.route_params().len();
                ctx.respond_with(Reply::model(serde_json::json!({ "params": params })));
            })
            .unwrap();
    }
    let test_paths = test_paths();
    c.bench_function("dispatch_json", |b| {
        b.iter(|| {
            for (method, path) in &test_paths {
                let request = Request::builder()
                    .method(method.clone())
                    .uri(*path)
                    .header("accept", "application/json")
                    .body(Vec::new())
                    .unwrap();
                black_box(router.serve(request));
            }
        })
    });
}

criterion_group!(benches, bench_route_resolution, bench_dispatch);
criterion_main!(benches);
