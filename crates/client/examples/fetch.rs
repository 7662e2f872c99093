//! Fetches a URI and prints the response.
//!
//! ```text
//! cargo run --example fetch -- http://127.0.0.1:8080/index.html
//! cargo run --example fetch -- post http://127.0.0.1:8080/echo "hello"
//! ```

use std::env;
use std::process::ExitCode;

use micro_http_client::protocol::{HttpError, Method};
use micro_http_client::Client;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let method = match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        Some("get") => Some(Method::Get),
        Some("post") => Some(Method::Post),
        Some("put") => Some(Method::Put),
        Some("delete") => Some(Method::Delete),
        _ => None,
    };
    let method = match method {
        Some(method) => {
            args.remove(0);
            method
        }
        None => Method::Get,
    };

    let Some(uri) = args.first().cloned() else {
        eprintln!("usage: fetch [get|post|put|delete] <uri> [body]");
        return ExitCode::FAILURE;
    };

    match fetch(method, &uri, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, %uri, "fetch failed");
            ExitCode::FAILURE
        }
    }
}

fn fetch(method: Method, uri: &str, body: Option<&str>) -> Result<(), HttpError> {
    let client = Client::new();
    let mut request = client.request(method, uri)?;
    if let Some(body) = body {
        request.headers_mut().set_content_type(&mime::TEXT_PLAIN_UTF_8)?;
        request.write(body)?;
    }

    let response = request.close()?;
    info!(status = response.status_code(), reason = response.reason_phrase(), "received response");

    println!("{:?} {} {}", response.version(), response.status_code(), response.reason_phrase());
    response.headers().for_each(|name, values| {
        for value in values {
            println!("{name}: {value}");
        }
    });
    println!();
    println!("{}", response.body());
    Ok(())
}
