//! A camera and decoder pair for running the kiosk without hardware.
//!
//! The "scene" in front of the lens is a shared optional string. Captured
//! frames carry its UTF-8 bytes as a single pixel row, and
//! [`TextFrameDecoder`] reads them back as the decoded marker payload.
//! `wayfind run` wires the console's `show`/`hide` commands to the scene.

use std::sync::{Arc, Mutex};

use wayfinder_core::error::WayfindError;
use wayfinder_core::models::DecodedText;

use crate::traits::{Camera, Frame, MarkerDecoder};

/// Handle for changing what the simulated camera sees.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    view: Arc<Mutex<Option<String>>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, text: impl Into<String>) {
        if let Ok(mut view) = self.view.lock() {
            *view = Some(text.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut view) = self.view.lock() {
            *view = None;
        }
    }

    fn current(&self) -> Option<String> {
        self.view.lock().ok().and_then(|v| v.clone())
    }
}

pub struct SimulatedCamera {
    scene: Scene,
    running: bool,
}

impl SimulatedCamera {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            running: false,
        }
    }
}

impl Camera for SimulatedCamera {
    fn start(&mut self) -> Result<(), WayfindError> {
        self.running = true;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, WayfindError> {
        if !self.running {
            return Err(WayfindError::DecodeUnavailable(
                "camera not started".to_string(),
            ));
        }
        let pixels = self.scene.current().unwrap_or_default().into_bytes();
        Ok(Frame {
            width: pixels.len() as u32,
            height: if pixels.is_empty() { 0 } else { 1 },
            pixels,
        })
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// Interprets a frame's pixel bytes as the marker payload.
pub struct TextFrameDecoder;

impl MarkerDecoder for TextFrameDecoder {
    fn decode(&self, frame: &Frame) -> Option<DecodedText> {
        if frame.pixels.is_empty() {
            return None;
        }
        std::str::from_utf8(&frame.pixels)
            .ok()
            .map(DecodedText::new)
    }
}
