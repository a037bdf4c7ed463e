//! Everything a connection needs, built once at startup and shared.

use std::sync::Arc;

use crate::config::Config;
use crate::control::{Command, Dispatcher};
use crate::dashboard::PageRenderer;
use crate::http::buffer::{BufferAccounting, RequestBuffer};
use crate::http::connection::READ_CHUNK;
use crate::http::parser::parse_http_request;
use crate::http::response::Response;
use crate::sensor::{InternalThermometer, SimulatedAdc, TemperatureSensor};

pub struct ServiceContext {
    pub dispatcher: Dispatcher,
    pub thermometer: Arc<dyn TemperatureSensor>,
    pub renderer: PageRenderer,
    pub buffers: Arc<BufferAccounting>,
    pub max_request_bytes: usize,
    pub strict_paths: bool,
}

impl ServiceContext {
    pub fn new(dispatcher: Dispatcher, thermometer: Arc<dyn TemperatureSensor>) -> Self {
        Self {
            dispatcher,
            thermometer,
            renderer: PageRenderer::new(),
            buffers: BufferAccounting::new(),
            max_request_bytes: READ_CHUNK,
            strict_paths: false,
        }
    }

    /// Host setup: log-only dispatcher and the simulated sensor.
    pub fn from_config(cfg: &Config) -> Self {
        let adc = SimulatedAdc::new(cfg.sensor.simulated_raw);
        let mut ctx = Self::new(Dispatcher::new(), Arc::new(InternalThermometer::new(adc)));
        ctx.max_request_bytes = cfg.server.max_request_bytes;
        ctx.strict_paths = cfg.server.strict_paths;
        ctx
    }

    /// Runs one request through dispatch, sampling and rendering.
    pub fn handle(&self, request: &RequestBuffer) -> Response {
        let text = request.as_text();
        let command = self.dispatcher.dispatch(&text);

        let parsed = parse_http_request(request.payload());
        match &parsed {
            Ok(req) => tracing::debug!(
                method = ?req.method,
                path = %req.path,
                host = req.header("Host").unwrap_or("-"),
                "Request line parsed"
            ),
            Err(e) => tracing::debug!(error = ?e, "Request not parseable"),
        }

        if self.strict_paths {
            match &parsed {
                Ok(req) => {
                    let known = req.route() == "/" || Command::from_route(req.route()).is_some();
                    if !known && command.is_none() {
                        tracing::warn!(path = %req.path, "Unknown path");
                        return Response::not_found();
                    }
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "Rejecting malformed request");
                    return Response::bad_request();
                }
            }
        }

        let temperature = self.thermometer.read_celsius();

        match self.renderer.render(temperature) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to render dashboard");
                Response::internal_error()
            }
        }
    }
}
