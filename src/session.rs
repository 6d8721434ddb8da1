//! # Form Session
//!
//! The in-memory state of one QR form: content fields, appearance and the
//! optional logo. Everything is recomputed from this state on every render;
//! nothing is persisted.
//!
//! ## Example
//!
//! ```
//! use qrkit::payload::ContentKind;
//! use qrkit::render::RasterRenderer;
//! use qrkit::session::Session;
//!
//! let mut session = Session::new();
//! session.collector_mut().set_kind(ContentKind::Wifi);
//! session.collector_mut().set_content("MyNet,secret123");
//!
//! assert_eq!(session.encoded_value(), "WIFI:S:MyNet;T:WPA;P:secret123;;");
//! let image = session.render(&RasterRenderer).unwrap().expect("content is not empty");
//! assert_eq!(image.width(), 208);
//! ```

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::collector::InputCollector;
use crate::error::Result;
use crate::payload::ContentSelection;
use crate::render::{
    OverlayImage, OverlaySpec, RenderConfig, RenderRequest, SymbolRenderer, compose_card,
};
use crate::upload::{self, UploadSlot, UploadTicket};

/// A whole form as stored in a form file.
///
/// ```json
/// {
///   "content": { "type": "url", "content": "example.com" },
///   "render": { "size": 300, "error_level": "H" },
///   "image": { "src": "data:image/png;base64,...", "width": 60 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Form {
    pub content: ContentSelection,
    pub render: RenderConfig,
    pub image: OverlayImage,
}

impl Form {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a form file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let form = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), kind = %form.content.kind(), "loaded form");
        Ok(form)
    }
}

/// The state of one QR form.
#[derive(Debug, Clone, Default)]
pub struct Session {
    collector: InputCollector,
    config: RenderConfig,
    overlay: OverlayImage,
    uploads: UploadSlot,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a saved form. Settings are pulled back into the form's
    /// slider ranges, since a form file can hold any number.
    pub fn from_form(form: Form) -> Self {
        let Form {
            content,
            mut render,
            mut image,
        } = form;
        render.clamp_to_form_ranges();
        image.clamp_to_form_ranges();
        image.clamp_offset(render.size);

        Self {
            collector: InputCollector::from_selection(&content),
            config: render,
            overlay: image,
            uploads: UploadSlot::new(),
        }
    }

    /// Snapshot the session as a form.
    pub fn to_form(&self) -> Form {
        Form {
            content: self.collector.selection(),
            render: self.config.clone(),
            image: self.overlay.clone(),
        }
    }

    pub fn collector(&self) -> &InputCollector {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut InputCollector {
        &mut self.collector
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    pub fn overlay(&self) -> &OverlayImage {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayImage {
        &mut self.overlay
    }

    /// The string the QR code carries for the current content.
    pub fn encoded_value(&self) -> String {
        self.collector.selection().encode()
    }

    /// Start loading a new overlay image.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.uploads.begin()
    }

    /// Apply a finished upload. Stale results are dropped; see
    /// [`UploadSlot::complete`].
    pub fn finish_upload(&mut self, ticket: UploadTicket, result: Result<String>) -> Result<bool> {
        let applied = self.uploads.complete(ticket, result)?;
        if applied && let Some(uri) = self.uploads.current() {
            self.overlay.src = uri.to_string();
        }
        Ok(applied)
    }

    /// Read an image file and make it the overlay.
    pub async fn load_overlay(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let ticket = self.begin_upload();
        let result = upload::read_data_uri(path).await;
        self.finish_upload(ticket, result)
    }

    /// Remove the overlay image, keeping its settings.
    pub fn clear_overlay(&mut self) {
        self.uploads.clear();
        self.overlay.src.clear();
    }

    /// Build the renderer request, or `None` when there is no content.
    pub fn render_request(&self) -> Result<Option<RenderRequest>> {
        let selection = self.collector.selection();
        if selection.is_empty() {
            return Ok(None);
        }

        let request = RenderRequest::new(selection.encode(), &self.config);
        if !self.overlay.has_image() {
            return Ok(Some(request));
        }

        let image = upload::decode_data_uri(&self.overlay.src)?;
        let spec = OverlaySpec {
            image,
            geometry: self.overlay.geometry(self.config.size),
            excavate: true,
        };
        Ok(Some(request.with_overlay(spec)))
    }

    /// Render the QR code with its title caption.
    ///
    /// Returns `Ok(None)` when there is no content, like the form showing
    /// nothing until something is typed.
    pub fn render(&self, renderer: &dyn SymbolRenderer) -> Result<Option<RgbaImage>> {
        let Some(request) = self.render_request()? else {
            tracing::debug!("no content, nothing to render");
            return Ok(None);
        };
        let symbol = renderer.render(&request)?;
        Ok(Some(compose_card(&symbol, &self.config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrKitError;
    use crate::payload::ContentKind;
    use crate::render::{Placement, RasterRenderer};
    use crate::upload::to_data_uri;
    use image::Rgba;
    use std::cell::RefCell;

    /// Records every request it receives.
    #[derive(Default)]
    struct RecordingRenderer {
        requests: RefCell<Vec<RenderRequest>>,
    }

    impl SymbolRenderer for RecordingRenderer {
        fn render(&self, request: &RenderRequest) -> Result<RgbaImage> {
            self.requests.borrow_mut().push(request.clone());
            Ok(RgbaImage::new(request.size, request.size))
        }
    }

    fn logo_uri() -> String {
        let logo = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        to_data_uri(&crate::render::to_png_bytes(&logo).unwrap(), "image/png")
    }

    #[test]
    fn test_empty_content_renders_nothing() {
        let session = Session::new();
        let renderer = RecordingRenderer::default();
        assert!(session.render(&renderer).unwrap().is_none());
        assert!(renderer.requests.borrow().is_empty());
    }

    #[test]
    fn test_request_carries_config() {
        let mut session = Session::new();
        session.collector_mut().set_kind(ContentKind::Url);
        session.collector_mut().set_content("example.com");
        session.config_mut().size = 300;
        session.config_mut().margin = 0;

        let renderer = RecordingRenderer::default();
        let image = session.render(&renderer).unwrap().unwrap();
        assert_eq!(image.width(), 300);

        let requests = renderer.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].value, "https://example.com");
        assert_eq!(requests[0].size, 300);
        assert!(requests[0].overlay.is_none());
    }

    #[test]
    fn test_overlay_geometry_follows_settings() {
        let mut session = Session::new();
        session.collector_mut().set_content("hello");
        session.overlay_mut().src = logo_uri();
        session.overlay_mut().width = 30;
        session.overlay_mut().placement = Placement::Offset { x: 7, y: 9 };

        let request = session.render_request().unwrap().unwrap();
        let overlay = request.overlay.expect("overlay requested");
        assert_eq!((overlay.geometry.left, overlay.geometry.top), (7.0, 9.0));
        assert_eq!(overlay.geometry.width, 30);
        assert!(overlay.excavate);
        assert_eq!(overlay.image.width(), 4);
    }

    #[test]
    fn test_overlay_without_image_is_skipped() {
        let mut session = Session::new();
        session.collector_mut().set_content("hello");
        session.overlay_mut().width = 80;
        let request = session.render_request().unwrap().unwrap();
        assert!(request.overlay.is_none());
    }

    #[test]
    fn test_broken_overlay_is_an_error() {
        let mut session = Session::new();
        session.collector_mut().set_content("hello");
        session.overlay_mut().src = "data:image/png;base64,AAAA".into();
        assert!(matches!(session.render_request(), Err(QrKitError::Image(_))));
    }

    #[test]
    fn test_finish_upload_sets_src() {
        let mut session = Session::new();
        let stale = session.begin_upload();
        let latest = session.begin_upload();
        assert!(session.finish_upload(latest, Ok("data:latest".into())).unwrap());
        assert!(!session.finish_upload(stale, Ok("data:stale".into())).unwrap());
        assert_eq!(session.overlay().src, "data:latest");

        session.clear_overlay();
        assert!(!session.overlay().has_image());
    }

    #[test]
    fn test_title_adds_caption() {
        let mut session = Session::new();
        session.collector_mut().set_content("hello");
        session.config_mut().title = "Hi".into();
        let image = session.render(&RasterRenderer).unwrap().unwrap();
        assert_eq!(image.dimensions(), (208, 248));
    }

    #[test]
    fn test_form_round_trip() {
        let json = r##"{
            "content": {"type": "wifi", "content": "Net,pw"},
            "render": {"size": 250, "foreground": "#112233"},
            "image": {"width": 40, "placement": {"mode": "offset", "x": 1, "y": 2}}
        }"##;
        let form = Form::from_json(json).unwrap();
        let session = Session::from_form(form.clone());
        assert_eq!(session.encoded_value(), "WIFI:S:Net;T:WPA;P:pw;;");
        assert_eq!(session.config().size, 250);
        assert_eq!(session.overlay().placement, Placement::Offset { x: 1, y: 2 });
        assert_eq!(session.to_form(), form);
    }

    #[test]
    fn test_form_settings_clamped_to_form_ranges() {
        let json = r##"{
            "content": {"type": "text", "content": "hello"},
            "render": {"size": 4294967295, "margin": 4294967295},
            "image": {"width": 100000, "opacity": 7.5, "placement": {"mode": "offset", "x": -5, "y": 9000}}
        }"##;
        let session = Session::from_form(Form::from_json(json).unwrap());
        assert_eq!((session.config().size, session.config().margin), (400, 10));
        assert_eq!(session.overlay().width, 100);
        assert_eq!(session.overlay().opacity, 1.0);
        assert_eq!(session.overlay().placement, Placement::Offset { x: 0, y: 350 });

        let image = session.render(&RasterRenderer).unwrap().unwrap();
        assert_eq!(image.dimensions(), (420, 420));
    }

    #[test]
    fn test_bad_form_is_config_error() {
        assert!(matches!(
            Form::from_json(r#"{"content": {"type": "fax"}}"#),
            Err(QrKitError::Config(_))
        ));
    }
}
