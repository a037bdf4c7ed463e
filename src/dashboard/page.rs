use std::fmt::Write;

use anyhow::{Context, bail};

use crate::control::Command;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Largest response, status line and headers included, the renderer will
/// hand to the writer.
pub const RESPONSE_CAPACITY: usize = 8400;

/// Shown in the monitoring panel until a level sensor is wired.
pub const WATER_LEVEL_PLACEHOLDER: &str = "87 cm";

const CONTENT_TYPE: &str = "text/html; charset=UTF-8";

const PAGE_HEAD: &str = "<!DOCTYPE html>\n\
<html lang=\"pt\">\n\
<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<meta http-equiv=\"X-UA-Compatible\" content=\"ie=edge\">\n\
<title>HomeControl - Automação Residencial</title>\n\
<style>\n\
body {\n\
background-color: #000000;\n\
font-family: 'Arial', sans-serif;\n\
text-align: center;\n\
margin-top: 20px;\n\
color: #333;\n\
}\n\
h1 {\n\
font-size: 48px;\n\
color: #2b78e4;\n\
margin-bottom: 30px;\n\
font-weight: bold;\n\
}\n\
h2 {\n\
color: #2b78e4;\n\
}\n\
button {\n\
background-color: #4CAF50;\n\
font-size: 24px;\n\
margin: 10px;\n\
padding: 15px 30px;\n\
border-radius: 10px;\n\
color: white;\n\
border: none;\n\
cursor: pointer;\n\
transition: background-color 0.3s ease;\n\
}\n\
button:hover {\n\
background-color: #45a049;\n\
}\n\
button:active {\n\
background-color: #388e3c;\n\
}\n\
.temperature {\n\
font-size: 36px;\n\
margin-top: 30px;\n\
color: #FF5722;\n\
font-weight: bold;\n\
}\n\
.control-panel {\n\
display: grid;\n\
grid-template-columns: repeat(2, 1fr);\n\
gap: 15px;\n\
max-width: 600px;\n\
margin: 0 auto;\n\
}\n\
.form-container {\n\
padding: 20px;\n\
background-color: #fff;\n\
border-radius: 10px;\n\
box-shadow: 0 4px 8px rgba(0, 0, 0, 0.1);\n\
}\n\
.control-panel form {\n\
margin: 10px 0;\n\
}\n\
</style>\n\
</head>\n";

/// Formats the dashboard around the latest sensor readings.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    water_level: String,
    capacity: usize,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer {
    pub fn new() -> Self {
        Self {
            water_level: WATER_LEVEL_PLACEHOLDER.to_string(),
            capacity: RESPONSE_CAPACITY,
        }
    }

    /// Overrides the response size limit.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the `200 OK` dashboard response for `temperature` (°C).
    ///
    /// Fails instead of truncating when the response would not fit.
    pub fn render(&self, temperature: f32) -> anyhow::Result<Response> {
        let body = self.render_body(temperature).context("formatting dashboard")?;

        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", CONTENT_TYPE)
            .body(body.into_bytes())
            .build();

        let len = response.encoded_len();
        if len > self.capacity {
            bail!("dashboard response is {} bytes, capacity is {}", len, self.capacity);
        }

        Ok(response)
    }

    /// The HTML document alone.
    pub fn render_body(&self, temperature: f32) -> Result<String, std::fmt::Error> {
        let mut html = String::with_capacity(self.capacity);

        html.push_str(PAGE_HEAD);
        html.push_str("<body>\n<h1>HomeControl - Automação Residencial</h1>\n");
        html.push_str("<div class=\"control-panel\">\n<div class=\"form-container\">\n");
        html.push_str("<h2>Controle de Dispositivos</h2>\n");

        for command in Command::ALL {
            write!(
                html,
                "<form action=\".{}\">\n<button type=\"submit\">{}</button>\n</form>\n",
                command.path(),
                command.label()
            )?;
        }

        html.push_str("</div>\n<div class=\"form-container\">\n<h2>Monitoramento</h2>\n");
        write!(
            html,
            "<p class=\"temperature\">Temperatura Interna: {:.2} °C</p>\n",
            temperature
        )?;
        write!(
            html,
            "<p class=\"temperature\">Nível de Água: {}</p>\n",
            self.water_level
        )?;
        html.push_str("</div>\n</div>\n</body>\n</html>\n");

        Ok(html)
    }
}
