//! Geolocation capture
//!
//! Wraps one position request with observable loading/error state. The
//! request is bounded by a timeout and is abandoned when the caller drops
//! the future.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::application::ports::{GeolocationError, GeolocationProvider};
use crate::domain::time_entry::Coordinates;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoState {
    pub loading: bool,
    pub position: Option<Coordinates>,
    pub error: Option<GeolocationError>,
}

pub struct GeolocationCapture {
    state: watch::Sender<GeoState>,
    timeout: Duration,
}

impl GeolocationCapture {
    pub fn new(timeout: Duration) -> Self {
        let (state, _) = watch::channel(GeoState::default());
        Self { state, timeout }
    }

    pub async fn capture(
        &self,
        provider: &dyn GeolocationProvider,
    ) -> Result<Coordinates, GeolocationError> {
        self.state.send_replace(GeoState {
            loading: true,
            ..Default::default()
        });

        let result = match tokio::time::timeout(self.timeout, provider.current_position()).await {
            Ok(result) => result,
            Err(_) => {
                debug!("Geolocation timed out after {:?}", self.timeout);
                Err(GeolocationError::Timeout)
            }
        };

        self.state.send_replace(GeoState {
            loading: false,
            position: result.ok(),
            error: result.err(),
        });
        result
    }

    pub fn state(&self) -> GeoState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GeoState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Slow;

    #[async_trait]
    impl GeolocationProvider for Slow {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Coordinates::new(0.0, 0.0).map_err(|_| GeolocationError::PositionUnavailable)
        }
    }

    struct Fixed(Result<Coordinates, GeolocationError>);

    #[async_trait]
    impl GeolocationProvider for Fixed {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            self.0
        }
    }

    #[tokio::test]
    async fn success_clears_loading_and_keeps_position() {
        let capture = GeolocationCapture::new(Duration::from_secs(1));
        let here = Coordinates::new(10.0, 20.0).unwrap();
        assert_eq!(capture.capture(&Fixed(Ok(here))).await, Ok(here));
        assert_eq!(
            capture.state(),
            GeoState {
                loading: false,
                position: Some(here),
                error: None
            }
        );
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let capture = GeolocationCapture::new(Duration::from_millis(20));
        assert_eq!(
            capture.capture(&Slow).await,
            Err(GeolocationError::Timeout)
        );
        let state = capture.state();
        assert!(!state.loading);
        assert_eq!(state.error, Some(GeolocationError::Timeout));
    }

    #[tokio::test]
    async fn loading_is_visible_while_pending() {
        let capture = GeolocationCapture::new(Duration::from_millis(200));
        let mut rx = capture.subscribe();
        let pending = capture.capture(&Slow);
        tokio::pin!(pending);

        tokio::select! {
            _ = &mut pending => panic!("should not finish first"),
            changed = rx.changed() => {
                changed.unwrap();
                assert!(rx.borrow().loading);
            }
        }
        // Abandon the request
        drop(pending);
    }

    #[tokio::test]
    async fn denied_is_reported() {
        let capture = GeolocationCapture::new(Duration::from_secs(1));
        let result = capture
            .capture(&Fixed(Err(GeolocationError::PermissionDenied)))
            .await;
        assert_eq!(result, Err(GeolocationError::PermissionDenied));
        assert_eq!(capture.state().error, Some(GeolocationError::PermissionDenied));
    }
}
