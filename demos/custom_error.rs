//! A custom error type travelling through sync and async catch boundaries.

use catch_error::{catch, catching, throw, try_catch_async, Outcome};
use thiserror::Error;

#[derive(Debug, Error)]
enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: String, status: u16 },
    #[error("rate limited, retry in {retry_after}s")]
    RateLimited { retry_after: u32 },
}

async fn fetch(path: &str) -> Result<String, ApiError> {
    tokio::task::yield_now().await;
    match path {
        "/users/7" => Ok("ferris".into()),
        "/hot" => Err(ApiError::RateLimited { retry_after: 30 }),
        other => Err(ApiError::NotFound {
            resource: other.into(),
            status: 404,
        }),
    }
}

#[catching]
fn checked_ratio(a: u32, b: u32) -> u32 {
    if b == 0 {
        throw(ApiError::NotFound {
            resource: "denominator".into(),
            status: 400,
        });
    }
    a / b
}

fn report<T: std::fmt::Debug>(label: &str, outcome: Outcome<T>) {
    match outcome {
        Ok(value) => println!("{label}: ok {value:?}"),
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(ApiError::NotFound { status, .. }) => {
                println!("{label}: {} (status {status})", err.message())
            }
            Some(ApiError::RateLimited { retry_after }) => {
                println!("{label}: back off for {retry_after}s")
            }
            None => println!("{label}: {err:#}"),
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    report("user", try_catch_async(fetch("/users/7")).await);
    report("missing", try_catch_async(fetch("/users/8")).await);
    report("hot", try_catch_async(fetch("/hot")).await);

    report("ratio", checked_ratio(10, 2));
    report("ratio by zero", checked_ratio(10, 0));

    report("overflow", catch(|| u8::MAX.checked_add(1).expect("overflow")));
}
