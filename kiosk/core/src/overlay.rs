//! Pour Overlay
//!
//! While a drink is being dispensed the kiosk covers the carousel with the
//! pouring artwork and lists every pour of the recipe with a spinner or a
//! checkmark next to it. The overlay owns the event loop until the watcher
//! reports done, then removes everything it added and drops the input that
//! piled up meanwhile.

use std::collections::BTreeMap;

use crate::compositor::{Compositor, DrawOp, LayerKey};
use crate::dispense::{PourStatus, Watcher};
use crate::error::SurfaceError;
use crate::geometry::{Point, Rect};
use crate::layout::Layout;
use crate::surface::{Clock, Color, FontSize, FrameLimiter, InputSource, Surface};

/// Where the pouring artwork is drawn
pub const BACKDROP_ORIGIN: Point = Point::new(0, -150);

/// Spinner rotation per frame, in degrees
pub const SPINNER_STEP: u32 = 5;

/// Vertical distance from the drink name baseline to the first pour line
const LIST_RISE: i32 = 325;

/// Lines after the first of one label are pulled up by this much each
const LINE_TIGHTENING: i32 = 10;

/// Status icon nudge above the first line center
const STATUS_NUDGE: i32 = 7;

/// Overlay artwork; any of it may be missing
#[derive(Clone, Debug, Default)]
pub struct OverlayAssets<I> {
    /// Full-screen pouring artwork
    pub backdrop: Option<I>,
    /// Spinner shown next to running pours
    pub spinner: Option<I>,
    /// Mark shown next to finished pours
    pub checkmark: Option<I>,
}

/// Layers owned by one pour
#[derive(Clone, Debug, PartialEq, Eq)]
struct PourLayout {
    lines: Vec<LayerKey>,
    status: LayerKey,
    status_center: Point,
}

/// Layout and spinner state of the overlay
///
/// Each pour is laid out the first time it is seen and keeps that place;
/// pours reported later are appended below.
#[derive(Debug)]
pub struct PourOverlay {
    angle: u32,
    pours: BTreeMap<usize, PourLayout>,
    line_cursor: i32,
    list_x: i32,
    text_y: i32,
    wrap_width: u32,
}

impl PourOverlay {
    /// Cover the carousel and prepare an empty pour list
    ///
    /// The background is copied on top of the carousel so the drink images
    /// disappear behind it.
    pub fn begin<I: Clone>(
        compositor: &mut Compositor<I>,
        assets: &OverlayAssets<I>,
        layout: &Layout,
    ) -> Self {
        if let Some(background) = compositor.get(&LayerKey::BACKGROUND).cloned() {
            compositor.upsert(LayerKey::POURING_BACKGROUND, background);
        }
        if let Some(backdrop) = &assets.backdrop {
            compositor.upsert(
                LayerKey::POURING,
                DrawOp::blit(backdrop.clone(), BACKDROP_ORIGIN),
            );
        }

        Self {
            angle: 0,
            pours: BTreeMap::new(),
            line_cursor: 0,
            list_x: layout.screen.width as i32 / 3,
            text_y: layout.text_center.y,
            wrap_width: layout.screen.width / 2,
        }
    }

    /// Spin the spinner one step and redraw every pour status
    pub fn step<S: Surface + ?Sized>(
        &mut self,
        pours: &[PourStatus],
        surface: &mut S,
        compositor: &mut Compositor<S::Image>,
        assets: &OverlayAssets<S::Image>,
    ) {
        self.angle = (self.angle + SPINNER_STEP) % 360;
        let spinner = assets
            .spinner
            .as_ref()
            .map(|s| surface.rotate(s, self.angle as f32));

        for (index, pour) in pours.iter().enumerate() {
            if !self.pours.contains_key(&index) {
                let laid_out = self.lay_out(index, pour, surface, compositor);
                self.pours.insert(index, laid_out);
            }
            let laid_out = &self.pours[&index];

            // A running pour without a spinner falls back to the checkmark
            let icon = match (&spinner, pour.running) {
                (Some(spinner), true) => Some(spinner),
                _ => assets.checkmark.as_ref(),
            };
            match icon {
                Some(icon) => {
                    let at =
                        Rect::centered_at(laid_out.status_center, surface.image_size(icon)).origin();
                    compositor.upsert(laid_out.status.clone(), DrawOp::blit(icon.clone(), at));
                }
                None => compositor.remove(&laid_out.status),
            }
        }
    }

    /// Wrap a pour label and register its lines below the previous pours
    fn lay_out<S: Surface + ?Sized>(
        &mut self,
        index: usize,
        pour: &PourStatus,
        surface: &S,
        compositor: &mut Compositor<S::Image>,
    ) -> PourLayout {
        let line_height = FontSize::Small.px() as i32;
        let y = self.text_y + line_height * self.line_cursor - LIST_RISE;

        let mut lines = Vec::new();
        for (i, text) in surface
            .wrap_text(&pour.to_string(), FontSize::Small, self.wrap_width)
            .into_iter()
            .enumerate()
        {
            let i = i as i32;
            let key = LayerKey::PourLine {
                pour: index,
                line: lines.len(),
            };
            compositor.upsert(
                key.clone(),
                DrawOp::Text {
                    text,
                    font: FontSize::Small,
                    color: Color::WHITE,
                    at: Point::new(self.list_x, y + (line_height - LINE_TIGHTENING) * i),
                },
            );
            lines.push(key);
            self.line_cursor += 1;
        }

        tracing::debug!(pour = index, lines = lines.len(), "Laid out pour");
        PourLayout {
            lines,
            status: LayerKey::PourStatus { pour: index },
            status_center: Point::new(
                self.list_x - line_height / 2,
                y - STATUS_NUDGE + line_height / 2,
            ),
        }
    }

    /// Remove every layer the overlay added
    pub fn finish<I>(self, compositor: &mut Compositor<I>) {
        for laid_out in self.pours.into_values() {
            for line in &laid_out.lines {
                compositor.remove(line);
            }
            compositor.remove(&laid_out.status);
        }
        compositor.remove(&LayerKey::POURING);
        compositor.remove(&LayerKey::POURING_BACKGROUND);
    }

    /// Number of pours laid out so far
    #[must_use]
    pub fn pour_count(&self) -> usize {
        self.pours.len()
    }
}

/// Show the overlay until `watcher` is done
///
/// Blocks the caller. Input received while pouring is discarded at the end.
///
/// # Errors
///
/// Returns an error if a frame cannot be presented.
pub fn show_pouring<F, W>(
    frontend: &mut F,
    compositor: &mut Compositor<F::Image>,
    watcher: &W,
    assets: &OverlayAssets<F::Image>,
    layout: &Layout,
    frame_rate: u32,
) -> Result<(), SurfaceError>
where
    F: Surface + InputSource + Clock,
    W: Watcher + ?Sized,
{
    let mut overlay = PourOverlay::begin(compositor, assets, layout);
    let mut limiter = FrameLimiter::new(frame_rate, &*frontend);

    while !watcher.done() {
        overlay.step(&watcher.pours(), frontend, compositor, assets);
        compositor.present(frontend)?;
        limiter.tick(frontend);
    }

    tracing::info!(pours = overlay.pour_count(), "Pour finished");
    overlay.finish(compositor);
    compositor.present(frontend)?;
    frontend.clear_events();
    Ok(())
}
