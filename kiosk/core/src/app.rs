//! Kiosk Main Loop
//!
//! [`Kiosk`] owns the frontend, the compositor and the carousel, and runs the
//! fixed-rate loop: drain input, maybe auto-reload, draw the drag or idle
//! view, present, wait for the next frame.
//!
//! Taps and swipes run their animations (and the pour overlay) to completion
//! before the loop resumes. Nothing is interruptible.

use std::time::Duration;

use crate::animation::{
    play, DualZoom, Pop, Rotate, Slide, SnapBack, POP_DURATION, POP_TARGET_SIZE, RELOAD_ROTATION,
    SLIDE_DURATION, ZOOM_DURATION, ZOOM_TARGET_SIZE,
};
use crate::assets::{load_scaled, Assets};
use crate::carousel::{Carousel, Direction};
use crate::catalog::{Drink, DrinkCatalog};
use crate::compositor::{Compositor, DrawOp, LayerKey};
use crate::config::KioskConfig;
use crate::dispense::{Dispenser, PourSize};
use crate::error::KioskError;
use crate::geometry::{Point, Size};
use crate::gesture::{Gesture, GestureRecognizer, SwipeOutcome};
use crate::layout::{HitRegion, Layout, LOGO_SIZE};
use crate::overlay::show_pouring;
use crate::surface::{Clock, Color, FrameLimiter, InputEvent, InputSource, Key, Surface};

/// Load a drink image scaled to the carousel size
fn drink_image<S, C>(surface: &mut S, catalog: &C, size: Size, drink: &C::Drink) -> Option<S::Image>
where
    S: Surface + ?Sized,
    C: DrinkCatalog + ?Sized,
{
    load_scaled(surface, &catalog.image_path(drink), size)
}

/// The cocktail kiosk
pub struct Kiosk<F, C, P>
where
    F: Surface,
    C: DrinkCatalog,
{
    frontend: F,
    catalog: C,
    dispenser: P,
    config: KioskConfig,
    layout: Layout,
    assets: Assets<F::Image>,
    compositor: Compositor<F::Image>,
    carousel: Carousel<C::Drink, F::Image>,
    gesture: GestureRecognizer,
    limiter: FrameLimiter,
    last_reload: Duration,
    running: bool,
}

impl<F, C, P> Kiosk<F, C, P>
where
    F: Surface + InputSource + Clock,
    C: DrinkCatalog,
    P: Dispenser<C::Drink>,
{
    /// Load artwork and drinks and set up the initial layers
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::NoValidDrinks`] if the catalog is empty and
    /// [`KioskError::Catalog`] if it cannot be read.
    pub fn new(
        mut frontend: F,
        mut catalog: C,
        dispenser: P,
        config: KioskConfig,
    ) -> Result<Self, KioskError> {
        let layout = Layout::new(frontend.size(), &config);
        let assets = Assets::load(&mut frontend, &config);

        let mut compositor = Compositor::new();
        match &assets.background {
            Some(background) => compositor.upsert(
                LayerKey::BACKGROUND,
                DrawOp::blit(background.clone(), Point::default()),
            ),
            None => compositor.upsert(
                LayerKey::BACKGROUND,
                DrawOp::Fill {
                    color: Color::BLACK,
                    area: None,
                },
            ),
        }

        let drinks = catalog
            .valid_drinks()
            .inspect_err(|e| tracing::error!(error = %e, "Could not load cocktails"))?;
        if drinks.is_empty() {
            tracing::error!("No valid cocktails found");
            return Err(KioskError::NoValidDrinks);
        }
        tracing::info!(count = drinks.len(), "Loaded cocktails");

        let size = layout.drink_size;
        let carousel = Carousel::new(drinks, 0, |d| {
            drink_image(&mut frontend, &catalog, size, d)
        })?;

        compositor.place(
            LayerKey::SINGLE_LOGO,
            assets.single.as_ref(),
            layout.single_rect.origin(),
        );
        compositor.place(
            LayerKey::DOUBLE_LOGO,
            assets.double.as_ref(),
            layout.double_rect.origin(),
        );
        if let Some(rect) = layout.reload_rect {
            compositor.place(LayerKey::RELOAD_LOGO, assets.reload.as_ref(), rect.origin());
        }

        let limiter = FrameLimiter::new(config.frame_rate, &frontend);
        let last_reload = frontend.now();
        Ok(Self {
            gesture: GestureRecognizer::new(layout.screen.width),
            frontend,
            catalog,
            dispenser,
            config,
            layout,
            assets,
            compositor,
            carousel,
            limiter,
            last_reload,
            running: true,
        })
    }

    /// Run until a quit event
    ///
    /// # Errors
    ///
    /// Returns an error if a frame cannot be presented.
    pub fn run(&mut self) -> Result<(), KioskError> {
        tracing::info!(frame_rate = self.config.frame_rate, "Kiosk running");
        while self.frame()? {}
        tracing::info!("Kiosk stopped");
        Ok(())
    }

    /// Run one iteration of the main loop and return whether to keep going
    ///
    /// # Errors
    ///
    /// Returns an error if a frame cannot be presented.
    pub fn frame(&mut self) -> Result<bool, KioskError> {
        while let Some(event) = self.frontend.next_event() {
            self.handle_event(event)?;
            if !self.running {
                return Ok(false);
            }
        }

        self.auto_reload();
        if self.gesture.is_dragging() {
            self.draw_drag_view();
        } else {
            self.draw_idle_view();
        }
        self.compositor.present(&mut self.frontend)?;
        self.limiter.tick(&mut self.frontend);
        Ok(true)
    }

    fn handle_event(&mut self, event: InputEvent) -> Result<(), KioskError> {
        match event {
            InputEvent::Quit | InputEvent::Key(Key::Char('q') | Key::Escape) => {
                tracing::info!(?event, "Quit requested");
                self.running = false;
            }
            InputEvent::Key(_) => {}
            InputEvent::PointerDown(pos) => self.gesture.pointer_down(pos),
            InputEvent::PointerMove(pos) => self.gesture.pointer_move(pos),
            InputEvent::PointerUp(pos) => {
                if let Some(release) = self.gesture.pointer_up(pos) {
                    match release.gesture {
                        Gesture::Tap(at) => self.tap(at)?,
                        Gesture::Swipe(SwipeOutcome::Commit(direction)) => {
                            self.commit_swipe(direction, release.offset)?;
                        }
                        Gesture::Swipe(SwipeOutcome::SnapBack) => self.snap_back(release.offset)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn tap(&mut self, pos: Point) -> Result<(), KioskError> {
        match self.layout.hit_test(pos) {
            Some(HitRegion::SinglePour) => self.pour(PourSize::Single),
            Some(HitRegion::DoublePour) => self.pour(PourSize::Double),
            Some(HitRegion::Reload) => self.press_reload(),
            Some(HitRegion::Favorite) => {
                self.toggle_favorite();
                Ok(())
            }
            None => {
                tracing::debug!(x = pos.x, y = pos.y, "Tap outside any button");
                Ok(())
            }
        }
    }

    fn pour(&mut self, size: PourSize) -> Result<(), KioskError> {
        let frame_rate = self.config.frame_rate;
        let (logo, rect, key) = match size {
            PourSize::Single => (
                self.assets.single.clone(),
                self.layout.single_rect,
                LayerKey::SINGLE_LOGO,
            ),
            PourSize::Double => (
                self.assets.double.clone(),
                self.layout.double_rect,
                LayerKey::DOUBLE_LOGO,
            ),
        };
        if let Some(logo) = logo {
            let mut pop = Pop::new(logo, rect, key, LOGO_SIZE, POP_TARGET_SIZE, POP_DURATION);
            play(&mut self.frontend, &mut self.compositor, &mut pop, frame_rate)?;
        }

        let drink = self.carousel.current();
        tracing::info!(drink = drink.display_name(), %size, "Pouring");
        match self.dispenser.make_drink(drink, size) {
            Ok(watcher) => show_pouring(
                &mut self.frontend,
                &mut self.compositor,
                &watcher,
                &self.assets.overlay,
                &self.layout,
                frame_rate,
            )?,
            Err(e) => {
                tracing::error!(drink = drink.display_name(), error = %e, "Dispenser refused drink");
            }
        }
        Ok(())
    }

    fn press_reload(&mut self) -> Result<(), KioskError> {
        tracing::debug!("Reloading cocktails due to reload button press");
        if let (Some(logo), Some(rect)) = (self.assets.reload.clone(), self.layout.reload_rect) {
            let mut rotate = Rotate::new(logo, rect, LayerKey::RELOAD_LOGO, RELOAD_ROTATION);
            play(
                &mut self.frontend,
                &mut self.compositor,
                &mut rotate,
                self.config.frame_rate,
            )?;
        }
        self.reload_drinks(self.carousel.index());
        Ok(())
    }

    fn toggle_favorite(&mut self) {
        let index = self.carousel.index();
        let result = if self.carousel.current().is_favorite() {
            tracing::debug!(index, "Unfavoriting current cocktail");
            self.catalog.unfavorite(index)
        } else {
            tracing::debug!(index, "Favoriting current cocktail");
            self.catalog.favorite(index)
        };
        match result {
            Ok(new_index) => self.reload_drinks(new_index),
            Err(e) => tracing::warn!(error = %e, "Could not change favorite"),
        }
    }

    fn commit_swipe(&mut self, direction: Direction, offset: i32) -> Result<(), KioskError> {
        // The whole gesture may arrive within one frame, before any drag view
        self.compositor.remove(&LayerKey::DRINK_NAME);
        self.compositor.remove(&LayerKey::FAVORITE_LOGO);

        let frame_rate = self.config.frame_rate;
        let position = self.carousel.position();
        let incoming = match direction {
            Direction::Next => position.next.clone(),
            Direction::Previous => position.previous.clone(),
        };
        let mut slide = Slide::new(
            position.current.clone(),
            incoming,
            direction,
            offset,
            self.layout.screen.width,
            self.layout.drink_origin,
            SLIDE_DURATION,
        );
        play(&mut self.frontend, &mut self.compositor, &mut slide, frame_rate)?;

        let size = self.layout.drink_size;
        let (frontend, catalog) = (&mut self.frontend, &self.catalog);
        self.carousel
            .advance(direction, |d| drink_image(frontend, catalog, size, d));
        tracing::debug!(
            index = self.carousel.index(),
            drink = self.carousel.current().display_name(),
            "Carousel moved"
        );

        if let (Some(single), Some(double)) = (self.assets.single.clone(), self.assets.double.clone())
        {
            let mut zoom = DualZoom::new(
                (single, self.layout.single_rect),
                (double, self.layout.double_rect),
                LOGO_SIZE,
                ZOOM_TARGET_SIZE,
                ZOOM_DURATION,
            );
            play(&mut self.frontend, &mut self.compositor, &mut zoom, frame_rate)?;
        }
        Ok(())
    }

    fn snap_back(&mut self, offset: i32) -> Result<(), KioskError> {
        let label = self
            .layout
            .label_op(&self.frontend, self.carousel.current().display_name());
        let mut snap = SnapBack::new(
            self.carousel.position().current.clone(),
            Some(label),
            offset,
            self.layout.drink_origin,
            SLIDE_DURATION,
        );
        play(
            &mut self.frontend,
            &mut self.compositor,
            &mut snap,
            self.config.frame_rate,
        )?;
        Ok(())
    }

    fn auto_reload(&mut self) {
        let Some(timeout) = self.config.reload_timeout else {
            return;
        };
        let now = self.frontend.now();
        if now.saturating_sub(self.last_reload) > timeout {
            tracing::debug!("Reloading cocktails due to auto reload timeout");
            self.reload_drinks(self.carousel.index());
            self.last_reload = now;
        }
    }

    /// Fetch the drink list again and select `index`; keep the current list
    /// if the catalog fails or comes back empty
    fn reload_drinks(&mut self, index: usize) {
        let drinks = match self.catalog.valid_drinks() {
            Ok(drinks) => drinks,
            Err(e) => {
                tracing::warn!(error = %e, "Reload failed, keeping current cocktails");
                return;
            }
        };
        let size = self.layout.drink_size;
        let (frontend, catalog) = (&mut self.frontend, &self.catalog);
        match self
            .carousel
            .reload(drinks, index, |d| drink_image(frontend, catalog, size, d))
        {
            Ok(()) => tracing::debug!(count = self.carousel.len(), index, "Reloaded cocktails"),
            Err(e) => tracing::warn!(error = %e, "Reload failed, keeping current cocktails"),
        }
    }

    fn draw_drag_view(&mut self) {
        self.compositor.remove(&LayerKey::DRINK_NAME);
        self.compositor.remove(&LayerKey::FAVORITE_LOGO);

        let offset = self.gesture.offset();
        let origin = self.layout.drink_origin;
        let width = self.layout.screen.width as i32;
        let position = self.carousel.position();

        self.compositor.place(
            LayerKey::CURRENT_DRINK,
            position.current.as_ref(),
            origin.offset_x(offset),
        );
        if offset < 0 {
            self.compositor.remove(&LayerKey::PREVIOUS_DRINK);
            self.compositor.place(
                LayerKey::NEXT_DRINK,
                position.next.as_ref(),
                origin.offset_x(width + offset),
            );
        } else if offset > 0 {
            self.compositor.remove(&LayerKey::NEXT_DRINK);
            self.compositor.place(
                LayerKey::PREVIOUS_DRINK,
                position.previous.as_ref(),
                origin.offset_x(offset - width),
            );
        }
    }

    fn draw_idle_view(&mut self) {
        self.compositor.remove(&LayerKey::NEXT_DRINK);
        self.compositor.remove(&LayerKey::PREVIOUS_DRINK);

        let drink = self.carousel.current();
        self.compositor.place(
            LayerKey::CURRENT_DRINK,
            self.carousel.position().current.as_ref(),
            self.layout.drink_origin,
        );
        let label = self.layout.label_op(&self.frontend, drink.display_name());
        self.compositor.upsert(LayerKey::DRINK_NAME, label);

        if let Some(rect) = self.layout.favorite_rect {
            let icon = if drink.is_favorite() && self.assets.favorite.is_some() {
                self.assets.favorite.as_ref()
            } else {
                self.assets.unfavorite.as_ref()
            };
            self.compositor
                .place(LayerKey::FAVORITE_LOGO, icon, rect.origin());
        }
    }

    /// Layers currently registered
    #[must_use]
    pub fn compositor(&self) -> &Compositor<F::Image> {
        &self.compositor
    }

    /// Carousel state
    #[must_use]
    pub fn carousel(&self) -> &Carousel<C::Drink, F::Image> {
        &self.carousel
    }

    /// Screen layout
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The frontend
    #[must_use]
    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// The frontend, mutably (to queue input in tests or demos)
    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// The drink catalog
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The dispenser
    #[must_use]
    pub fn dispenser(&self) -> &P {
        &self.dispenser
    }

    /// Whether the loop is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}
