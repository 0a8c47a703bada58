//! Simulated Pumps
//!
//! Stands in for the real dispensing hardware. Every ingredient becomes one
//! pour running on a tokio task; a semaphore bounds how many pumps run at
//! once and each pour takes a fixed time per ounce. The kiosk only sees the
//! returned [`PumpWatcher`], which it polls from its own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;

use kiosk_core::{DispenseError, Dispenser, Drink, PourSize, PourStatus, Watcher};

use crate::catalog::Cocktail;

/// Longest a single simulated pour may take
const MAX_POUR_TIME: Duration = Duration::from_secs(600);

/// One pour as shared between a pump task and the watcher
#[derive(Debug)]
struct PourSlot {
    label: String,
    running: AtomicBool,
}

/// Watcher over the pours of one drink
#[derive(Clone, Debug)]
pub struct PumpWatcher {
    slots: Arc<Vec<PourSlot>>,
}

impl Watcher for PumpWatcher {
    fn done(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| !slot.running.load(Ordering::Acquire))
    }

    fn pours(&self) -> Vec<PourStatus> {
        self.slots
            .iter()
            .map(|slot| PourStatus::new(slot.running.load(Ordering::Acquire), slot.label.clone()))
            .collect()
    }
}

/// Pumps simulated on a tokio runtime
pub struct SimulatedDispenser {
    runtime: Handle,
    pumps: Arc<Semaphore>,
    seconds_per_oz: f32,
    active: Option<PumpWatcher>,
}

impl SimulatedDispenser {
    /// Run pours on `runtime`, at most `concurrency` at a time
    pub fn new(runtime: Handle, concurrency: usize, seconds_per_oz: f32) -> Self {
        Self {
            runtime,
            pumps: Arc::new(Semaphore::new(concurrency.max(1))),
            seconds_per_oz: seconds_per_oz.max(0.0),
            active: None,
        }
    }

    fn pour_time(&self, ounces: f32) -> Duration {
        Duration::try_from_secs_f32(ounces * self.seconds_per_oz)
            .map_or(MAX_POUR_TIME, |time| time.min(MAX_POUR_TIME))
    }
}

impl Dispenser<Cocktail> for SimulatedDispenser {
    type Watcher = PumpWatcher;

    fn make_drink(&mut self, drink: &Cocktail, size: PourSize) -> Result<PumpWatcher, DispenseError> {
        if self.active.as_ref().is_some_and(|w| !w.done()) {
            return Err(DispenseError::Busy);
        }

        let pours: Vec<(String, f32)> = drink
            .ingredients
            .iter()
            .filter(|i| i.amount > 0.0)
            .map(|i| (i.name.clone(), i.amount * size.multiplier()))
            .collect();
        if pours.is_empty() {
            return Err(DispenseError::Rejected {
                drink: drink.display_name().to_string(),
                reason: "nothing to pour".to_string(),
            });
        }

        let slots: Arc<Vec<PourSlot>> = Arc::new(
            pours
                .iter()
                .map(|(name, ounces)| PourSlot {
                    label: format!("Pouring {ounces:.1} oz {name}"),
                    running: AtomicBool::new(true),
                })
                .collect(),
        );

        for (index, (_, ounces)) in pours.iter().enumerate() {
            let pumps = Arc::clone(&self.pumps);
            let slots = Arc::clone(&slots);
            let duration = self.pour_time(*ounces);
            self.runtime.spawn(async move {
                // Only fails once the semaphore is closed, which never happens
                if let Ok(_permit) = pumps.acquire_owned().await {
                    tokio::time::sleep(duration).await;
                }
                slots[index].running.store(false, Ordering::Release);
            });
        }

        tracing::info!(
            drink = drink.display_name(),
            size = %size,
            pours = pours.len(),
            "Started drink"
        );
        let watcher = PumpWatcher { slots };
        self.active = Some(watcher.clone());
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Ingredient;
    use pretty_assertions::assert_eq;

    fn mojito() -> Cocktail {
        Cocktail {
            name: "Mojito".to_string(),
            ingredients: vec![
                Ingredient {
                    name: "Rum".to_string(),
                    amount: 1.5,
                },
                Ingredient {
                    name: "Lime".to_string(),
                    amount: 0.5,
                },
                Ingredient {
                    name: "Mint".to_string(),
                    amount: 0.0,
                },
            ],
            favorite: false,
            enabled: true,
            image: None,
        }
    }

    async fn wait_done(watcher: &PumpWatcher) {
        for _ in 0..200 {
            if watcher.done() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("pours never finished");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pours_scale_with_size_and_finish() {
        let mut dispenser = SimulatedDispenser::new(Handle::current(), 3, 0.0);
        let watcher = dispenser.make_drink(&mojito(), PourSize::Double).unwrap();

        let labels: Vec<String> = watcher.pours().into_iter().map(|p| p.label).collect();
        assert_eq!(
            labels,
            vec!["Pouring 3.0 oz Rum".to_string(), "Pouring 1.0 oz Lime".to_string()]
        );

        wait_done(&watcher).await;
        assert!(watcher.pours().iter().all(|p| !p.running));
        assert!(watcher.done());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_busy_while_pouring() {
        let mut dispenser = SimulatedDispenser::new(Handle::current(), 1, 60.0);
        let watcher = dispenser.make_drink(&mojito(), PourSize::Single).unwrap();
        assert!(!watcher.done());

        assert!(matches!(
            dispenser.make_drink(&mojito(), PourSize::Single),
            Err(DispenseError::Busy)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_next_drink_after_previous_finished() {
        let mut dispenser = SimulatedDispenser::new(Handle::current(), 2, 0.0);
        let first = dispenser.make_drink(&mojito(), PourSize::Single).unwrap();
        wait_done(&first).await;
        assert!(dispenser.make_drink(&mojito(), PourSize::Single).is_ok());
    }

    #[tokio::test]
    async fn test_pour_time_is_capped() {
        let dispenser = SimulatedDispenser::new(Handle::current(), 1, f32::MAX);
        assert_eq!(dispenser.pour_time(f32::MAX), MAX_POUR_TIME);
        assert_eq!(dispenser.pour_time(1.0), MAX_POUR_TIME);

        let quick = SimulatedDispenser::new(Handle::current(), 1, 2.0);
        assert_eq!(quick.pour_time(1.5), Duration::from_secs(3));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_drink_without_amounts_is_rejected() {
        let mut dispenser = SimulatedDispenser::new(Handle::current(), 3, 0.0);
        let mut water = mojito();
        water.ingredients.retain(|i| i.amount == 0.0);

        assert!(matches!(
            dispenser.make_drink(&water, PourSize::Single),
            Err(DispenseError::Rejected { .. })
        ));
    }
}
