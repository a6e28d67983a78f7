/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! The request surface a paired client page expects, independent of the
//! transport that carries it.
//!
//! The transport (HTTP server, socket handling) lives outside of this crate.
//! It passes the request path to [`handle`] and sends the returned
//! [`Response`]. Handling a request is bounded work and never blocks.

use crate::acquisition::SampleStore;
use crate::export::{CsvExport, LatestExport};
use crate::sample::Timestamp;
use crate::session::Recorder;

/// Maximum length of an asset path after appending the index document.
const MAX_ASSET_PATH_LEN: usize = 128;

/// Document served for directory paths such as `/`.
const INDEX_DOCUMENT: &str = "index.html";

/// Read-only store of bundled static files (UI, scripts, styles).
pub trait AssetStore {
    /// Returns the content of the file at `path` (starting with `/`).
    fn get(&self, path: &str) -> Option<&[u8]>;
}

/// An asset store without any files.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn get(&self, _path: &str) -> Option<&[u8]> {
        None
    }
}

/// A parsed request path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/start`
    Start,
    /// `/stop`
    Stop,
    /// `/data`
    Data,
    /// `/live_data`
    LiveData,
    /// `/favicon.ico`
    Favicon,
    /// Anything else is looked up in the [`AssetStore`].
    Asset(&'a str),
}

impl<'a> Route<'a> {
    /// Parses a request path. The query string is ignored.
    #[must_use]
    pub fn parse(path: &'a str) -> Self {
        let path = path.split_once('?').map_or(path, |(path, _query)| path);
        match path {
            "/start" => Self::Start,
            "/stop" => Self::Stop,
            "/data" => Self::Data,
            "/live_data" => Self::LiveData,
            "/favicon.ico" => Self::Favicon,
            other => Self::Asset(other),
        }
    }
}

/// Body of a [`Response`]. Rendering to bytes is up to the transport.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Body<'a> {
    /// No content.
    Empty,
    /// Static text.
    Text(&'static str),
    /// CSV export of the last session.
    Csv(CsvExport<'a>),
    /// JSON-serializable latest sample.
    Json(LatestExport),
    /// Content of a static file.
    Asset(&'a [u8]),
}

/// The response to a request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Response<'a> {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// Content.
    pub body: Body<'a>,
}

impl<'a> Response<'a> {
    const fn ok(content_type: &'static str, body: Body<'a>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    const fn no_content() -> Self {
        Self {
            status: 204,
            content_type: "text/plain",
            body: Body::Empty,
        }
    }

    const fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain",
            body: Body::Text("Arquivo não encontrado"),
        }
    }
}

/// Returns the content type for a file name based on its extension. Only the
/// last path segment is considered, so dots in directory names are ignored.
#[must_use]
pub fn content_type(path: &str) -> &'static str {
    let file_name = path.rsplit_once('/').map_or(path, |(_, name)| name);
    let extension = file_name.rsplit_once('.').map_or("", |(_, ext)| ext);
    match extension {
        "htm" | "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "ico" => "image/x-icon",
        "json" => "application/json",
        _ => "text/plain",
    }
}

/// Looks up a static file. Directory paths (ending in `/`) resolve to their
/// index document.
fn serve_asset<'a, A: AssetStore + ?Sized>(assets: &'a A, path: &str) -> Response<'a> {
    let mut full_path = heapless::String::<MAX_ASSET_PATH_LEN>::new();
    if full_path.push_str(path).is_err()
        || (path.ends_with('/') && full_path.push_str(INDEX_DOCUMENT).is_err())
    {
        log::warn!("Asset path too long: {path}");
        return Response::not_found();
    }

    match assets.get(&full_path) {
        Some(content) => Response::ok(content_type(&full_path), Body::Asset(content)),
        None => {
            log::warn!("Asset not found: {full_path}");
            Response::not_found()
        }
    }
}

/// Handles a single request.
///
/// `now` is the time the request is handled; it becomes the start time of a
/// session started by `/start`.
pub fn handle<'a, S: SampleStore, A: AssetStore + ?Sized, const W: usize>(
    recorder: &'a mut Recorder<S, W>,
    assets: &'a A,
    path: &str,
    now: Timestamp,
) -> Response<'a> {
    match Route::parse(path) {
        Route::Start => {
            recorder.start(now);
            Response::ok("text/plain", Body::Text("Gravando..."))
        }
        Route::Stop => {
            recorder.stop();
            Response::ok("text/plain", Body::Text("Parado"))
        }
        Route::Data => Response::ok("text/plain", Body::Csv(recorder.export_csv())),
        Route::LiveData => Response::ok("application/json", Body::Json(recorder.export_latest())),
        Route::Favicon => Response::no_content(),
        Route::Asset(path) => serve_asset(assets, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{LatestSlot, SessionBuffer};
    use crate::config::RecorderConfig;
    use crate::session::RecorderState;
    use crate::test_utils::{ScriptedInput, StaticAssets};
    use assert2::{check, let_assert};
    use std::string::ToString;

    fn at_ms(ms: u32) -> Timestamp {
        Timestamp::from_micros(ms as u64 * 1000)
    }

    #[test]
    fn parse_routes() {
        check!(Route::parse("/start") == Route::Start);
        check!(Route::parse("/stop") == Route::Stop);
        check!(Route::parse("/data") == Route::Data);
        check!(Route::parse("/data?t=123") == Route::Data);
        check!(Route::parse("/live_data") == Route::LiveData);
        check!(Route::parse("/favicon.ico") == Route::Favicon);
        check!(Route::parse("/") == Route::Asset("/"));
        check!(Route::parse("/script.js?v=2") == Route::Asset("/script.js"));
    }

    #[test]
    fn content_types_by_extension() {
        check!(content_type("/index.html") == "text/html");
        check!(content_type("/old.htm") == "text/html");
        check!(content_type("/style.css") == "text/css");
        check!(content_type("/script.js") == "application/javascript");
        check!(content_type("/logo.png") == "image/png");
        check!(content_type("/photo.jpg") == "image/jpeg");
        check!(content_type("/favicon.ico") == "image/x-icon");
        check!(content_type("/config.json") == "application/json");
        check!(content_type("/README") == "text/plain");
        check!(content_type("/notes.txt") == "text/plain");
        check!(content_type("/v1.2/app") == "text/plain");
        check!(content_type("/v1.2/app.js") == "application/javascript");
        check!(content_type("/assets.css/") == "text/plain");
        check!(content_type("index.html") == "text/html");
    }

    #[test]
    fn start_and_data() {
        let mut recorder = Recorder::<SessionBuffer<3000>>::new(
            RecorderConfig::bounded_csv(),
            SessionBuffer::new(),
        );
        let mut input = ScriptedInput::constant(7);

        let response = handle(&mut recorder, &NoAssets, "/start", at_ms(0));
        check!(response.status == 200);
        check!(response.content_type == "text/plain");
        check!(response.body == Body::Text("Gravando..."));
        check!(recorder.state() == RecorderState::Recording);

        recorder.tick(at_ms(1), &mut input);
        recorder.tick(at_ms(3001), &mut input);

        let response = handle(&mut recorder, &NoAssets, "/data", at_ms(3002));
        check!(response.status == 200);
        let_assert!(Body::Csv(csv) = response.body);
        check!(csv.to_string() == "Tempo (ms),Bruto,Filtrado\n1,7,7\n");
    }

    #[test]
    fn live_data_and_stop() {
        let mut recorder = Recorder::<LatestSlot>::new(RecorderConfig::live(), LatestSlot::new());
        let mut input = ScriptedInput::constant(9);

        let response = handle(&mut recorder, &NoAssets, "/live_data", at_ms(0));
        check!(response.content_type == "application/json");
        check!(response.body == Body::Json(LatestExport::STOPPED));

        handle(&mut recorder, &NoAssets, "/start", at_ms(0));
        recorder.tick(at_ms(1), &mut input);
        let response = handle(&mut recorder, &NoAssets, "/live_data", at_ms(1));
        check!(response.body == Body::Json(LatestExport::from_record((1, 9, 9).into())));

        let response = handle(&mut recorder, &NoAssets, "/stop", at_ms(2));
        check!(response.status == 200);
        check!(recorder.state() == RecorderState::Idle);
    }

    #[test]
    fn favicon_is_no_content() {
        let mut recorder = Recorder::<LatestSlot>::new(RecorderConfig::live(), LatestSlot::new());
        let response = handle(&mut recorder, &NoAssets, "/favicon.ico", at_ms(0));
        check!(response.status == 204);
        check!(response.body == Body::Empty);
    }

    #[test]
    fn static_assets() {
        const FILES: &[(&str, &[u8])] = &[
            ("/index.html", b"<html></html>"),
            ("/css/style.css", b"body {}"),
        ];
        let assets = StaticAssets::new(FILES);
        let mut recorder = Recorder::<LatestSlot>::new(RecorderConfig::live(), LatestSlot::new());

        let response = handle(&mut recorder, &assets, "/", at_ms(0));
        check!(response.status == 200);
        check!(response.content_type == "text/html");
        check!(response.body == Body::Asset(b"<html></html>"));

        let response = handle(&mut recorder, &assets, "/css/style.css", at_ms(0));
        check!(response.content_type == "text/css");

        let response = handle(&mut recorder, &assets, "/missing.js", at_ms(0));
        check!(response.status == 404);
        check!(response.content_type == "text/plain");
    }

    #[test]
    fn overlong_asset_path_is_not_found() {
        let long = "/a".repeat(MAX_ASSET_PATH_LEN);
        let mut recorder = Recorder::<LatestSlot>::new(RecorderConfig::live(), LatestSlot::new());
        let response = handle(&mut recorder, &NoAssets, &long, at_ms(0));
        check!(response.status == 404);
    }
}
