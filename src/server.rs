//! `POST /generate` over `tiny_http`

use std::io::{Cursor, Read};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{info, warn};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::{Error, Messages, QuoteCard, Result};

/// Largest accepted request body; avatars and media arrive base64-encoded.
pub const MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

type HttpResponse = Response<Cursor<Vec<u8>>>;

/// A running server. Dropping the handle leaves the server running; call
/// [`ServerHandle::shutdown`] to stop it.
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<Server>,
    thread: JoinHandle<()>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the accept loop exits.
    pub fn join(self) {
        let _ = self.thread.join();
    }

    /// Stop accepting requests and wait for the accept loop to exit.
    pub fn shutdown(self) {
        self.server.unblock();
        let _ = self.thread.join();
    }
}

/// Bind `addr` and serve requests on a background thread.
pub fn start(card: Arc<QuoteCard>, addr: &str) -> Result<ServerHandle> {
    let server = Server::http(addr)
        .map_err(|e| Error::Other(format!("Failed to bind {}: {}", addr, e)))?;
    let bound = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| Error::Other(format!("{} is not an IP listener", addr)))?;
    let server = Arc::new(server);
    info!("listening on http://{}", bound);

    let accept = server.clone();
    let thread = thread::spawn(move || {
        for request in accept.incoming_requests() {
            let card = card.clone();
            thread::spawn(move || handle(&card, request));
        }
    });

    Ok(ServerHandle {
        addr: bound,
        server,
        thread,
    })
}

fn handle(card: &QuoteCard, mut request: Request) {
    let path = request.url().split('?').next().unwrap_or("").to_string();
    let is_post = *request.method() == Method::Post;
    let response = match path.as_str() {
        "/generate" if is_post => generate(card, &mut request),
        "/generate" => text_response(405, "method not allowed".to_string()),
        _ => text_response(404, "not found".to_string()),
    };

    if let Err(e) = request.respond(response) {
        warn!("failed to send response for {}: {}", path, e);
    }
}

fn generate(card: &QuoteCard, request: &mut Request) -> HttpResponse {
    let mut body = Vec::new();
    if let Err(e) = request.as_reader().take(MAX_BODY_BYTES).read_to_end(&mut body) {
        return text_response(400, format!("failed to read body: {}", e));
    }

    let rendered = serde_json::from_slice::<Messages>(&body)
        .map_err(Error::from)
        .and_then(|messages| card.render_image(&messages));

    match rendered {
        Ok(image) => {
            let mut response = Response::from_data(image.data);
            if let Ok(header) = format!("Content-Type: {}", image.format.media_type()).parse::<Header>() {
                response = response.with_header(header);
            }
            response
        }
        Err(e) if e.is_client_error() => {
            warn!("rejected request: {}", e);
            text_response(422, e.to_string())
        }
        Err(e) => {
            warn!("generation failed: {}", e);
            text_response(500, e.to_string())
        }
    }
}

fn text_response(status: u16, body: String) -> HttpResponse {
    let mut response = Response::from_string(body).with_status_code(status);
    if let Ok(header) = "Content-Type: text/plain; charset=utf-8".parse::<Header>() {
        response = response.with_header(header);
    }
    response
}
