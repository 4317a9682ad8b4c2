#![no_main]

use arbitrary::Arbitrary;
use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::{Request, header};
use libfuzzer_sys::fuzz_target;
use testrack_api::Payload;
use testrack_core::types::{JobSpec, TestEnvironmentSpec, TestSpec};

const CONTENT_TYPES: [Option<&str>; 5] = [
    None,
    Some("application/json"),
    Some("application/x-www-form-urlencoded"),
    Some("application/vnd.testrack+json"),
    Some("text/plain"),
];

#[derive(Arbitrary, Debug)]
struct Input {
    content_type: u8,
    target: u8,
    body: Vec<u8>,
}

fn request(content_type: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/");
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    match builder.body(Body::from(body)) {
        Ok(req) => req,
        Err(_) => Request::new(Body::empty()),
    }
}

fuzz_target!(|input: Input| {
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt,
        Err(_) => return,
    };
    let content_type = CONTENT_TYPES[usize::from(input.content_type) % CONTENT_TYPES.len()];
    let req = request(content_type, input.body);

    runtime.block_on(async {
        match input.target % 3 {
            0 => {
                let _ = Payload::<JobSpec>::from_request(req, &()).await;
            }
            1 => {
                // 중첩 타입은 form으로 디코딩되면 안 됨
                if let Ok(payload) = Payload::<TestEnvironmentSpec>::from_request(req, &()).await {
                    assert_eq!(payload.encoding, testrack_api::PayloadEncoding::Document);
                }
            }
            _ => {
                let _ = Payload::<TestSpec>::from_request(req, &()).await;
            }
        }
    });
});
