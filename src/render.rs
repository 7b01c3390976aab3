//! Rendering collaborator invoked by the driver on tick events.

use crate::core::particle::{Color, DIM};
use std::time::Duration;

/// Presentation sink. Called only from the tick branch of the event loop,
/// never from collision handling.
pub trait Renderer {
    fn clear(&mut self);
    fn draw_particle(&mut self, position: [f64; DIM], radius: f64, color: Color);
    fn present(&mut self);
    /// Frame pacing; blocking is allowed.
    fn pause(&mut self, duration: Duration);
}

/// Discards everything; for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}
    fn draw_particle(&mut self, _position: [f64; DIM], _radius: f64, _color: Color) {}
    fn present(&mut self) {}
    fn pause(&mut self, _duration: Duration) {}
}

/// One drawn disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub position: [f64; DIM],
    pub radius: f64,
    pub color: Color,
}

/// Everything drawn between a `clear` and a `present`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub sprites: Vec<Sprite>,
}

/// Keeps every presented frame in memory. Pauses are skipped.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pending: Frame,
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl Renderer for FrameRecorder {
    fn clear(&mut self) {
        self.pending.sprites.clear();
    }

    fn draw_particle(&mut self, position: [f64; DIM], radius: f64, color: Color) {
        self.pending.sprites.push(Sprite {
            position,
            radius,
            color,
        });
    }

    fn present(&mut self) {
        self.frames.push(std::mem::take(&mut self.pending));
    }

    fn pause(&mut self, _duration: Duration) {}
}
