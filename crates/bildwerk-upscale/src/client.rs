// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async upscale client.
//
// One request per call: the image is uploaded as the multipart field `image`,
// optional `width`/`height` text fields pick the target size, and the response
// body is decoded as an image. There is no retry and no timeout.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, instrument};

use bildwerk_core::config::UpscaleConfig;
use bildwerk_core::error::{BildwerkError, Result};

/// Which engine to use and what size to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpscaleRequest {
    pub engine_id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<&UpscaleConfig> for UpscaleRequest {
    fn from(config: &UpscaleConfig) -> Self {
        Self {
            engine_id: config.engine_id.clone(),
            width: config.width,
            height: config.height,
        }
    }
}

/// Async client bound to a single API host and key.
pub struct UpscaleClient {
    http: reqwest::Client,
    api_host: String,
    api_key: String,
}

impl UpscaleClient {
    /// Create a client for `api_host` (e.g. `https://api.stability.ai`).
    pub fn new(api_host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_host = api_host.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            api_host,
            api_key: api_key.into(),
        }
    }

    /// Create a client from the persisted settings, reading the key from the
    /// configured environment variable.
    pub fn from_config(config: &UpscaleConfig) -> Result<Self> {
        let key = config
            .api_key()
            .ok_or_else(|| BildwerkError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::new(config.api_host.clone(), key))
    }

    /// Full URL of the upscale endpoint for `engine_id`.
    pub fn endpoint(&self, engine_id: &str) -> String {
        format!(
            "{}/v1/generation/{}/image-to-image/upscale",
            self.api_host, engine_id
        )
    }

    /// Upload encoded image bytes and return the decoded upscaled image.
    ///
    /// # Errors
    ///
    /// * [`BildwerkError::UpscaleRequest`] — the request could not be sent or
    ///   the body could not be read.
    /// * [`BildwerkError::UpscaleRejected`] — any status other than 200.
    /// * [`BildwerkError::InvalidImageData`] — the body is not an image.
    #[instrument(skip(self, image_bytes), fields(engine = %request.engine_id, bytes = image_bytes.len()))]
    pub async fn upscale_bytes(
        &self,
        image_bytes: Vec<u8>,
        request: &UpscaleRequest,
    ) -> Result<DynamicImage> {
        let part = Part::bytes(image_bytes)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| BildwerkError::UpscaleRequest(format!("multipart: {e}")))?;
        let mut form = Form::new().part("image", part);
        if let Some(width) = request.width {
            form = form.text("width", width.to_string());
        }
        if let Some(height) = request.height {
            form = form.text("height", height.to_string());
        }

        let url = self.endpoint(&request.engine_id);
        info!(url = %url, width = ?request.width, height = ?request.height, "sending upscale request");
        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "image/png")
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BildwerkError::UpscaleRequest(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "upscale request rejected");
            return Err(BildwerkError::UpscaleRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BildwerkError::UpscaleRequest(format!("reading response: {e}")))?;
        debug!(bytes = body.len(), "upscale response received");

        let image = image::load_from_memory(&body)
            .map_err(|e| BildwerkError::InvalidImageData(e.to_string()))?;
        info!(
            width = image.width(),
            height = image.height(),
            "upscaled image decoded"
        );
        Ok(image)
    }

    /// Upscale the image file at `input` and write the result to `output` as
    /// PNG.
    #[instrument(skip(self, request), fields(input = %input.display(), output = %output.display()))]
    pub async fn upscale_file(
        &self,
        input: &Path,
        output: &Path,
        request: &UpscaleRequest,
    ) -> Result<DynamicImage> {
        let bytes = tokio::fs::read(input).await?;
        let image = self.upscale_bytes(bytes, request).await?;
        image
            .save_with_format(output, ImageFormat::Png)
            .map_err(|e| {
                BildwerkError::ImageError(format!(
                    "failed to save upscaled image to {}: {}",
                    output.display(),
                    e
                ))
            })?;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([9, 99, 199])));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &'static str, body: Vec<u8>) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (host, handle)
    }

    /// Read headers plus a Content-Length or chunked body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return data;
            }
            data.extend_from_slice(&chunk[..n]);

            let Some(split) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&data[..split]).to_ascii_lowercase();
            let body_len = data.len() - (split + 4);

            let content_length = head.lines().find_map(|line| {
                line.strip_prefix("content-length:")
                    .and_then(|v| v.trim().parse::<usize>().ok())
            });
            match content_length {
                Some(len) if body_len >= len => return data,
                Some(_) => continue,
                None if data.ends_with(b"0\r\n\r\n") => return data,
                None => continue,
            }
        }
    }

    fn request() -> UpscaleRequest {
        UpscaleRequest {
            engine_id: "esrgan-v1-x2plus".into(),
            width: Some(1024),
            height: None,
        }
    }

    #[tokio::test]
    async fn successful_upscale_decodes_image() {
        let (host, server) = serve_once("200 OK", png(16, 8)).await;
        let client = UpscaleClient::new(host, "test-key");

        let image = client.upscale_bytes(png(8, 4), &request()).await.unwrap();
        assert_eq!((image.width(), image.height()), (16, 8));

        let raw = server.await.unwrap();
        let text = String::from_utf8_lossy(&raw).to_ascii_lowercase();
        assert!(text.starts_with("post /v1/generation/esrgan-v1-x2plus/image-to-image/upscale"));
        assert!(text.contains("authorization: bearer test-key"));
        assert!(text.contains("accept: image/png"));
        assert!(text.contains("name=\"image\""));
        assert!(text.contains("name=\"width\""));
        assert!(text.contains("1024"));
        assert!(!text.contains("name=\"height\""));
    }

    #[tokio::test]
    async fn non_200_carries_body_text() {
        let (host, server) = serve_once("401 Unauthorized", b"bad key".to_vec()).await;
        let client = UpscaleClient::new(host, "nope");

        let err = client.upscale_bytes(png(2, 2), &request()).await.unwrap_err();
        match err {
            BildwerkError::UpscaleRejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_image_data() {
        let (host, server) = serve_once("200 OK", b"definitely not a png".to_vec()).await;
        let client = UpscaleClient::new(host, "k");

        let err = client.upscale_bytes(png(2, 2), &request()).await.unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidImageData(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn upscale_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input_image.png");
        let output = dir.path().join("upscaled_image.png");
        std::fs::write(&input, png(3, 3)).unwrap();

        let (host, server) = serve_once("200 OK", png(6, 6)).await;
        let client = UpscaleClient::new(host, "k");
        client.upscale_file(&input, &output, &request()).await.unwrap();
        server.await.unwrap();

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (6, 6));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = UpscaleClient::new("https://api.example.com/", "k");
        assert_eq!(
            client.endpoint("esrgan-v1-x2plus"),
            "https://api.example.com/v1/generation/esrgan-v1-x2plus/image-to-image/upscale"
        );
    }

    #[test]
    fn missing_key_is_reported_with_variable_name() {
        let config = UpscaleConfig {
            api_key_env: "BILDWERK_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        match UpscaleClient::from_config(&config) {
            Err(BildwerkError::MissingApiKey(var)) => {
                assert_eq!(var, "BILDWERK_TEST_KEY_THAT_IS_NEVER_SET")
            }
            _ => panic!("expected MissingApiKey"),
        }
    }
}
