use std::rc::Rc;

use runtime::budget::RetryBudget;
use runtime::frame::Frame;
use scene::surface::GlobeSurface;
use tracing::{error, info};

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;

pub type SurfaceProvider = Box<dyn FnMut() -> Option<Rc<dyn GlobeSurface>>>;

pub enum BootstrapPoll {
    Waiting,
    Ready(Rc<dyn GlobeSurface>),
}

/// Waits for the globe surface to come up.
///
/// The provider is asked at most `max_attempts` times, no more often than
/// every `retry_interval_ms`. Once the budget runs out every later poll
/// reports [`BootstrapError::TimedOut`].
pub struct SurfaceBootstrap {
    provider: SurfaceProvider,
    budget: RetryBudget,
    max_attempts: u32,
    surface: Option<Rc<dyn GlobeSurface>>,
    reported: bool,
}

impl SurfaceBootstrap {
    pub fn new(config: &BootstrapConfig, provider: SurfaceProvider) -> Self {
        Self {
            provider,
            budget: RetryBudget::new(
                config.max_attempts,
                config.retry_interval_ms as f64 / 1000.0,
            ),
            max_attempts: config.max_attempts,
            surface: None,
            reported: false,
        }
    }

    pub fn attempts_left(&self) -> u32 {
        self.budget.remaining_attempts()
    }

    pub fn poll(&mut self, frame: Frame) -> Result<BootstrapPoll, BootstrapError> {
        if let Some(surface) = &self.surface {
            return Ok(BootstrapPoll::Ready(surface.clone()));
        }
        if self.budget.try_attempt(frame.time) {
            if let Some(surface) = (self.provider)() {
                let used = self.max_attempts - self.budget.remaining_attempts();
                info!("globe surface ready after {used} attempt(s)");
                self.surface = Some(surface.clone());
                return Ok(BootstrapPoll::Ready(surface));
            }
        }
        if self.budget.is_exhausted() {
            let err = BootstrapError::TimedOut {
                attempts: self.max_attempts,
            };
            if !self.reported {
                self.reported = true;
                error!("{err}");
            }
            return Err(err);
        }
        Ok(BootstrapPoll::Waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::{BootstrapPoll, SurfaceBootstrap};
    use crate::config::BootstrapConfig;
    use crate::error::BootstrapError;
    use runtime::frame::Frame;
    use scene::surface::GlobeSurface;
    use scene::world::Globe;
    use std::cell::Cell;
    use std::rc::Rc;

    fn config(max_attempts: u32) -> BootstrapConfig {
        BootstrapConfig {
            max_attempts,
            retry_interval_ms: 50,
        }
    }

    #[test]
    fn ready_once_the_provider_answers() {
        let calls = Rc::new(Cell::new(0));
        let provider = {
            let calls = calls.clone();
            Box::new(move || {
                calls.set(calls.get() + 1);
                (calls.get() == 3).then(|| Rc::new(Globe::new()) as Rc<dyn GlobeSurface>)
            })
        };
        let mut boot = SurfaceBootstrap::new(&config(10), provider);

        let mut frame = Frame::new(0, 0.025);
        let mut ready = false;
        for _ in 0..10 {
            if let Ok(BootstrapPoll::Ready(_)) = boot.poll(frame) {
                ready = true;
                break;
            }
            frame = frame.next();
        }
        assert!(ready);
        // Polled every other frame: attempts at 0, 50 and 100 ms.
        assert_eq!(calls.get(), 3);
        assert!(matches!(boot.poll(frame), Ok(BootstrapPoll::Ready(_))));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn times_out_after_the_budget() {
        let mut boot = SurfaceBootstrap::new(&config(2), Box::new(|| None::<Rc<dyn GlobeSurface>>));
        let mut frame = Frame::new(0, 0.05);
        assert!(matches!(boot.poll(frame), Ok(BootstrapPoll::Waiting)));
        frame = frame.next();
        assert_eq!(
            boot.poll(frame).err(),
            Some(BootstrapError::TimedOut { attempts: 2 })
        );
        assert_eq!(boot.attempts_left(), 0);
        assert!(boot.poll(frame.next()).is_err());
    }
}
