use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use micro_http_client::protocol::{HttpError, ParseError, RequestError};
use micro_http_client::Client;

/// A request as seen by the test server.
#[derive(Debug)]
struct Received {
    head: String,
    body: Vec<u8>,
}

impl Received {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

fn read_request(stream: &mut TcpStream) -> Received {
    let mut data = Vec::new();
    let mut buf = [0u8; 512];
    let head_end = loop {
        if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "client closed before sending the header section");
        data.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8(data[..head_end].to_vec()).unwrap();
    let mut received = Received { head, body: data[head_end..].to_vec() };
    let length: usize = received.header("content-length").map_or(0, |value| value.parse().unwrap());
    while received.body.len() < length {
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "client closed before sending the whole body");
        received.body.extend_from_slice(&buf[..n]);
    }
    received
}

/// Serves a single connection: reads one request, answers with `respond`, closes.
///
/// The response is written `chunk_size` bytes at a time.
fn serve_once<F>(chunk_size: usize, respond: F) -> (u16, JoinHandle<Received>)
where
    F: FnOnce(&Received) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let received = read_request(&mut stream);
        for chunk in respond(&received).chunks(chunk_size) {
            stream.write_all(chunk).unwrap();
            stream.flush().unwrap();
        }
        received
    });

    (port, handle)
}

fn response(status_line: &str, headers: &[(&str, String)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("{status_line}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    let mut out = out.into_bytes();
    out.extend_from_slice(body);
    out
}

#[test]
fn get_with_content_length() {
    let (port, server) = serve_once(3, |_| {
        response("HTTP/1.1 200 OK", &[("Content-Length", "11".to_string())], b"01234567890")
    });

    let response = micro_http_client::get(format!("http://127.0.0.1:{port}/0123456789")).unwrap().close().unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.reason_phrase(), "OK");
    assert_eq!(response.content_length(), Some(11));
    assert_eq!(response.body(), "01234567890");

    let received = server.join().unwrap();
    assert_eq!(received.request_line(), "GET /0123456789 HTTP/1.1");
    assert_eq!(received.header("host"), Some(format!("127.0.0.1:{port}").as_str()));
    assert_eq!(received.header("connection"), Some("close"));
    assert_eq!(received.header("accept-encoding"), Some("identity"));
    assert_eq!(received.header("content-length"), None);
}

#[test]
fn post_echo_on_fresh_connections() {
    const PAYLOAD: &str = "ABCDEFGHIJKLMONPQRSTUVWXYZ";
    let client = Client::new();

    for _ in 0..10 {
        let (port, server) = serve_once(64, |received| {
            let body = received.body.clone();
            response("HTTP/1.1 200 OK", &[("Content-Length", body.len().to_string())], &body)
        });

        let mut request = client.post(format!("http://127.0.0.1:{port}/echo")).unwrap();
        request.write(PAYLOAD).unwrap();
        let response = request.close().unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.content_length(), Some(PAYLOAD.len() as u64));
        assert_eq!(response.body(), PAYLOAD);

        let received = server.join().unwrap();
        assert_eq!(received.request_line(), "POST /echo HTTP/1.1");
        assert_eq!(received.header("content-length"), Some("26"));
        assert_eq!(received.body, PAYLOAD.as_bytes());
    }
}

#[test]
fn put_with_query() {
    let (port, server) = serve_once(64, |_| response("HTTP/1.1 204 No Content", &[], b""));

    let mut request = Client::new().put(format!("http://127.0.0.1:{port}/items/7?version=2")).unwrap();
    request.query("note", "a&b c");
    request.write("{}").unwrap();
    let response = request.close().unwrap();

    assert_eq!(response.status_code(), 204);
    assert_eq!(response.body(), "");

    let received = server.join().unwrap();
    assert_eq!(received.request_line(), "PUT /items/7?version=2&note=a%26b+c HTTP/1.1");
    assert_eq!(received.body, b"{}");
}

#[test]
fn not_found_body_until_eof() {
    let (port, server) = serve_once(5, |_| response("HTTP/1.1 404 Not Found", &[], b"Page not found"));

    let response = micro_http_client::delete(format!("http://127.0.0.1:{port}/missing")).unwrap().close().unwrap();

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.reason_phrase(), "Not Found");
    assert_eq!(response.content_length(), None);
    assert_eq!(response.body(), "Page not found");
    assert_eq!(server.join().unwrap().request_line(), "DELETE /missing HTTP/1.1");
}

#[test]
fn custom_reason_and_response_headers() {
    let (port, server) = serve_once(1, |_| {
        response(
            "HTTP/1.1 301 Moved Somewhere Else",
            &[
                ("Location", "/new".to_string()),
                ("Date", "Sun, 06 Nov 1994 08:49:37 GMT".to_string()),
                ("Content-Type", "text/html; charset=utf-8".to_string()),
                ("Content-Length", "0".to_string()),
            ],
            b"",
        )
    });

    let response = micro_http_client::get(format!("http://127.0.0.1:{port}/old")).unwrap().close().unwrap();
    server.join().unwrap();

    assert_eq!(response.status_code(), 301);
    assert_eq!(response.reason_phrase(), "Moved Somewhere Else");

    let headers = response.headers();
    assert_eq!(headers.get("location"), Some(vec!["/new".to_string()]));
    assert_eq!(headers.content_type(), Some(mime::TEXT_HTML_UTF_8));
    assert_eq!(headers.date(), Some(httpdate::parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap()));
    assert!(!headers.persistent_connection());
}

#[test]
fn chunked_transfer_encoding_is_rejected() {
    let (port, server) = serve_once(64, |_| {
        response("HTTP/1.1 200 OK", &[("Transfer-Encoding", "chunked".to_string())], b"5\r\nhello\r\n0\r\n\r\n")
    });

    let result = micro_http_client::get(format!("http://127.0.0.1:{port}/")).unwrap().close();
    server.join().unwrap();

    assert!(matches!(
        result,
        Err(HttpError::ResponseError { source: ParseError::UnsupportedTransferEncoding { .. } })
    ));
}

#[test]
fn write_fails_on_get_and_delete() {
    let client = Client::new();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut request = client.get(format!("http://127.0.0.1:{port}/")).unwrap();
    assert_eq!(request.write("data"), Err(RequestError::BodyNotAllowed { method: "GET" }));
    drop(request);

    let mut request = client.delete(format!("http://127.0.0.1:{port}/")).unwrap();
    assert_eq!(request.write("data"), Err(RequestError::BodyNotAllowed { method: "DELETE" }));
    drop(request);

    // nothing was sent on either connection
    for _ in 0..2 {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        assert!(buf.is_empty());
    }
}

#[test]
fn large_body_with_small_read_buffer() {
    const BODY_SIZE: usize = 1024 * 1024;
    let body = "0123456789abcdef".repeat(BODY_SIZE / 16);
    let expected = body.clone();

    let (port, server) = serve_once(16 * 1024, move |_| {
        response("HTTP/1.1 200 OK", &[("Content-Length", BODY_SIZE.to_string())], body.as_bytes())
    });

    let client = Client::builder().read_buffer_size(1000).build();
    let response = client.get(format!("http://127.0.0.1:{port}/large")).unwrap().close().unwrap();
    server.join().unwrap();

    assert_eq!(response.content_length(), Some(BODY_SIZE as u64));
    assert_eq!(response.body().len(), BODY_SIZE);
    assert!(response.body() == expected);
}

#[test]
fn connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = micro_http_client::get(format!("http://127.0.0.1:{port}/"));
    assert!(matches!(result, Err(HttpError::SendError { .. })));
}
