//! End-to-end kiosk scenarios
//!
//! Drives a full [`Kiosk`] through the recording frontend: swipes across the
//! carousel, taps on and off the buttons, and a two-pour dispense with the
//! overlay running until the watcher finishes.

use kiosk_core::testing::{Painted, RecordingSurface, ScriptedDispenser, VecCatalog};
use kiosk_core::{
    Drink, InputEvent, Kiosk, KioskConfig, KioskError, LayerKey, Point, PourSize, Size,
};
use pretty_assertions::assert_eq;

const DRINKS: [&str; 5] = ["Mojito", "Margarita", "Daiquiri", "Gimlet", "Negroni"];

type TestKiosk = Kiosk<RecordingSurface, VecCatalog, ScriptedDispenser>;

fn kiosk_with(config: KioskConfig, script: Vec<(String, u32)>) -> TestKiosk {
    Kiosk::new(
        RecordingSurface::new(Size::new(720, 720)),
        VecCatalog::new(&DRINKS),
        ScriptedDispenser::new(script),
        config,
    )
    .unwrap()
}

fn kiosk() -> TestKiosk {
    kiosk_with(KioskConfig::default(), Vec::new())
}

fn press(kiosk: &mut TestKiosk, down: Point, up: Point) {
    let frontend = kiosk.frontend_mut();
    frontend.push_event(InputEvent::PointerDown(down));
    frontend.push_event(InputEvent::PointerMove(up));
    frontend.push_event(InputEvent::PointerUp(up));
}

fn has_image(frame: &[Painted], name: &str) -> bool {
    frame.iter().any(|p| p.image_name() == Some(name))
}

// =============================================================================
// Carousel
// =============================================================================

#[test]
fn test_swipe_left_moves_to_next_drink() {
    let mut kiosk = kiosk();
    kiosk.frame().unwrap();

    // 720 px wide: the commit threshold is 180
    press(&mut kiosk, Point::new(500, 300), Point::new(300, 300));
    kiosk.frame().unwrap();

    assert_eq!(kiosk.carousel().index(), 1);
    assert_eq!(kiosk.carousel().current().display_name(), "Margarita");

    // The outgoing drink left the screen entirely during the slide
    let frames = kiosk.frontend().frames();
    assert!(frames.iter().any(|frame| frame.iter().any(|p| matches!(
        p,
        Painted::Image { name, at, .. } if name == "mojito" && at.x == -720
    ))));

    // After the dual zoom the logos are back at their resting size
    let last = kiosk.frontend().last_frame();
    assert!(last.iter().any(|p| matches!(
        p,
        Painted::Image { name, size, .. } if name == "single" && *size == Size::square(150)
    )));
    assert!(has_image(last, "margarita"));
    assert!(!kiosk.compositor().contains(&LayerKey::NEXT_DRINK));
}

#[test]
fn test_swipe_within_one_frame_hides_label_and_favorite() {
    let config = KioskConfig {
        allow_favorites: true,
        ..KioskConfig::default()
    };
    let mut kiosk = kiosk_with(config, Vec::new());
    kiosk.frame().unwrap();
    assert!(has_image(kiosk.frontend().last_frame(), "unfavorite"));

    press(&mut kiosk, Point::new(500, 300), Point::new(300, 300));
    kiosk.frame().unwrap();

    let frames = kiosk.frontend().frames();
    let animated = &frames[1..frames.len() - 1];
    assert!(!animated.is_empty());
    for frame in animated {
        assert!(!frame.iter().any(|p| matches!(p, Painted::Text { .. })));
        assert!(!has_image(frame, "unfavorite"));
    }

    // The idle view brings both back for the new drink
    let last = kiosk.frontend().last_frame();
    assert!(has_image(last, "unfavorite"));
    assert!(last
        .iter()
        .any(|p| matches!(p, Painted::Text { text, .. } if text == "Margarita")));
}

#[test]
fn test_swipe_right_from_first_drink_wraps_to_last() {
    let mut kiosk = kiosk();
    kiosk.frame().unwrap();

    press(&mut kiosk, Point::new(200, 300), Point::new(450, 300));
    kiosk.frame().unwrap();

    assert_eq!(kiosk.carousel().index(), 4);
    assert_eq!(kiosk.carousel().current().display_name(), "Negroni");
}

#[test]
fn test_full_lap_returns_to_start() {
    let mut kiosk = kiosk();
    for _ in 0..DRINKS.len() {
        press(&mut kiosk, Point::new(500, 300), Point::new(250, 300));
        kiosk.frame().unwrap();
    }
    assert_eq!(kiosk.carousel().index(), 0);
}

#[test]
fn test_short_swipe_snaps_back() {
    let mut kiosk = kiosk();
    kiosk.frame().unwrap();

    press(&mut kiosk, Point::new(500, 300), Point::new(400, 300));
    kiosk.frame().unwrap();

    assert_eq!(kiosk.carousel().index(), 0);
    assert!(kiosk.compositor().contains(&LayerKey::DRINK_NAME));
}

// =============================================================================
// Taps
// =============================================================================

#[test]
fn test_tap_outside_buttons_does_nothing() {
    let mut kiosk = kiosk();
    kiosk.frame().unwrap();
    let layers_before: Vec<_> = kiosk.compositor().keys().cloned().collect();
    let frames_before = kiosk.frontend().frames().len();

    press(&mut kiosk, Point::new(10, 10), Point::new(10, 10));
    kiosk.frame().unwrap();

    // Just the regular frame, no animation
    assert_eq!(kiosk.frontend().frames().len(), frames_before + 1);
    assert_eq!(kiosk.carousel().index(), 0);
    assert!(kiosk.dispenser().requests().is_empty());
    let layers_after: Vec<_> = kiosk.compositor().keys().cloned().collect();
    assert_eq!(layers_after, layers_before);
}

#[test]
fn test_hidden_reload_button_is_not_tappable() {
    let mut kiosk = kiosk();
    kiosk.frame().unwrap();

    press(&mut kiosk, Point::new(110, 160), Point::new(110, 160));
    kiosk.frame().unwrap();

    assert_eq!(kiosk.catalog().load_count(), 1);
}

#[test]
fn test_reload_button_spins_and_reloads() {
    let config = KioskConfig {
        show_reload_button: true,
        ..KioskConfig::default()
    };
    let mut kiosk = kiosk_with(config, Vec::new());
    kiosk.frame().unwrap();

    press(&mut kiosk, Point::new(110, 160), Point::new(110, 160));
    kiosk.frame().unwrap();

    assert_eq!(kiosk.catalog().load_count(), 2);
    let rotations: Vec<u32> = kiosk
        .frontend()
        .frames()
        .iter()
        .filter_map(|frame| {
            frame.iter().find_map(|p| match p {
                Painted::Image { name, rotation, .. } if name == "reload" => Some(*rotation),
                _ => None,
            })
        })
        .collect();
    assert_eq!(rotations.iter().max(), Some(&180));
}

#[test]
fn test_empty_catalog_fails_startup() {
    let result = Kiosk::new(
        RecordingSurface::new(Size::new(720, 720)),
        VecCatalog::new(&[]),
        ScriptedDispenser::default(),
        KioskConfig::default(),
    );
    assert!(matches!(result, Err(KioskError::NoValidDrinks)));
}

// =============================================================================
// Pour Overlay
// =============================================================================

#[test]
fn test_two_pour_overlay_timeline() {
    let mut kiosk = kiosk_with(
        KioskConfig::default(),
        vec![("Rum".to_string(), 10), ("Lime".to_string(), 25)],
    );
    kiosk.frame().unwrap();

    press(&mut kiosk, Point::new(60, 300), Point::new(60, 300));
    kiosk.frame().unwrap();

    assert_eq!(
        kiosk.dispenser().requests(),
        &[("Mojito".to_string(), PourSize::Single)]
    );

    let frontend = kiosk.frontend();
    let frames = frontend.frames();
    let start = frames
        .iter()
        .position(|f| has_image(f, "pouring"))
        .expect("overlay never shown");
    let overlay_frames = frames[start..]
        .iter()
        .take_while(|f| has_image(f, "pouring"))
        .count();
    assert_eq!(overlay_frames, 25);

    // The two status slots are the topmost images of each overlay frame
    for tick in 1..=25 {
        let images = frontend.images_in(start + tick - 1);
        let status = &images[images.len() - 2..];
        let expected: [&str; 2] = match tick {
            1..=9 => ["loading", "loading"],
            10..=24 => ["checkmark", "loading"],
            _ => ["checkmark", "checkmark"],
        };
        assert_eq!(status, expected, "tick {tick}");
    }

    // Teardown frame shows the carousel again
    let teardown = &frames[start + 25];
    assert!(!has_image(teardown, "pouring"));
    assert!(!has_image(teardown, "loading"));
    assert!(!has_image(teardown, "checkmark"));
    let texts: Vec<&str> = teardown
        .iter()
        .filter_map(|p| match p {
            Painted::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Mojito"]);

    for key in kiosk.compositor().keys() {
        assert!(
            !matches!(key, LayerKey::PourLine { .. } | LayerKey::PourStatus { .. }),
            "leftover overlay layer {key:?}"
        );
    }
    assert!(!kiosk.compositor().contains(&LayerKey::POURING));
    assert!(!kiosk.compositor().contains(&LayerKey::POURING_BACKGROUND));
}

#[test]
fn test_input_during_pour_is_discarded() {
    let mut kiosk = kiosk_with(KioskConfig::default(), vec![("Rum".to_string(), 20)]);
    kiosk.frame().unwrap();

    press(&mut kiosk, Point::new(600, 300), Point::new(600, 300));
    // Lands while the logo pops or the overlay runs
    kiosk
        .frontend_mut()
        .schedule_event(10, InputEvent::PointerDown(Point::new(400, 300)));
    kiosk
        .frontend_mut()
        .schedule_event(11, InputEvent::PointerUp(Point::new(100, 300)));
    kiosk.frame().unwrap();
    kiosk.frame().unwrap();

    assert_eq!(
        kiosk.dispenser().requests(),
        &[("Mojito".to_string(), PourSize::Double)]
    );
    assert_eq!(kiosk.frontend().clear_count(), 1);
    assert_eq!(
        kiosk.frontend().observed_events(),
        &[
            InputEvent::PointerDown(Point::new(600, 300)),
            InputEvent::PointerMove(Point::new(600, 300)),
            InputEvent::PointerUp(Point::new(600, 300)),
        ]
    );
    assert_eq!(kiosk.carousel().index(), 0);
}
