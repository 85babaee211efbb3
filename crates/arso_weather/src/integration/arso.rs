use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::FromIntegrationMessage;
use super::FromIntegrationSender;
use super::Integration;
use crate::bulletin::BulletinParser;
use crate::bulletin::ForecastDay;
use crate::bulletin::ObservationError;
use crate::bulletin::WeatherObservation;
use crate::config::ConfigError;
use crate::config::StationConfig;
use crate::entity::Entity;
use crate::entity::Weather;
use crate::feed::FeedClient;
use crate::feed::FetchError;
use crate::feed::client::fetch_entries;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Observation(#[from] ObservationError),
}

/// ARSO weather integration
///
/// Exposes one weather entity for the configured station and refreshes it
/// from the observation and forecast feeds every scan interval.
pub struct ArsoIntegration<C: FeedClient> {
    client: Arc<C>,
    station: StationConfig,
    parser: BulletinParser,
    weather: Arc<Mutex<Weather>>,
    /// Handle to the background polling task
    poll_task: Option<JoinHandle<()>>,
}

impl<C: FeedClient + 'static> ArsoIntegration<C> {
    /// Create a new ARSO integration for `station`
    ///
    /// Fails if the station settings are invalid (e.g. a zero scan interval).
    pub fn new(client: C, station: &StationConfig) -> Result<Self, ConfigError> {
        station.validate()?;

        let weather = Weather::new(station.entity_id(), station.name.clone());
        Ok(Self {
            client: Arc::new(client),
            station: station.clone(),
            parser: BulletinParser::default(),
            weather: Arc::new(Mutex::new(weather)),
            poll_task: None,
        })
    }

    pub fn entity_id(&self) -> String {
        self.station.entity_id()
    }

    /// Shared handle to the weather entity
    pub fn weather(&self) -> Arc<Mutex<Weather>> {
        self.weather.clone()
    }

    /// Run a single poll cycle and return the entity's rendered state
    pub async fn poll_once(&self) -> serde_json::Value {
        Self::poll(&*self.client, &self.station, &self.parser, &self.weather).await
    }

    async fn poll(
        client: &C,
        station: &StationConfig,
        parser: &BulletinParser,
        weather: &Mutex<Weather>,
    ) -> serde_json::Value {
        info!("Polling ARSO feeds for station {}", station.id);

        let observation = Self::fetch_observation(client, station, parser).await;
        let forecast = Self::fetch_forecast(client, station, parser).await;

        let mut weather = weather.lock().await;
        match observation {
            Ok(observation) => weather.apply_observation(observation),
            Err(e) => error!("Failed to update observation for {}: {}", station.id, e),
        }
        match forecast {
            Ok(forecast) => {
                if forecast.is_empty() {
                    warn!("ARSO forecast for {} has no usable entries", station.forecast_region);
                }
                weather.apply_forecast(forecast);
            }
            Err(e) => error!("Failed to update forecast for {}: {}", station.forecast_region, e),
        }

        debug!("Poll cycle for {} complete", station.id);
        weather.state_json()
    }

    async fn fetch_observation(
        client: &C,
        station: &StationConfig,
        parser: &BulletinParser,
    ) -> Result<WeatherObservation, PollError> {
        let entries = fetch_entries(client, &station.observation_url()).await?;
        Ok(parser.parse_observation(&entries)?)
    }

    async fn fetch_forecast(
        client: &C,
        station: &StationConfig,
        parser: &BulletinParser,
    ) -> Result<Vec<ForecastDay>, PollError> {
        let entries = fetch_entries(client, &station.forecast_url()).await?;
        Ok(parser.parse_forecast(&entries))
    }

    /// Poll every scan interval until the host hangs up
    async fn run_poll_loop(
        client: Arc<C>,
        station: StationConfig,
        parser: BulletinParser,
        weather: Arc<Mutex<Weather>>,
        to_host: FromIntegrationSender,
    ) {
        let entity_id = station.entity_id();
        let mut interval = tokio::time::interval(station.scan_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let state = Self::poll(&*client, &station, &parser, &weather).await;
            let msg = FromIntegrationMessage::WeatherUpdated {
                entity_id: entity_id.clone(),
                state,
            };
            if to_host.send(msg).await.is_err() {
                debug!("Host channel closed, stopping ARSO poll task");
                break;
            }
        }
    }
}

#[async_trait]
impl<C: FeedClient + 'static> Integration for ArsoIntegration<C> {
    fn name(&self) -> &str {
        "arso"
    }

    async fn setup(&mut self, tx: FromIntegrationSender) -> Result<(), Box<dyn Error + Send>> {
        let entity_id = self.entity_id();
        let platform = self.weather.lock().await.platform();
        info!(
            "Setting up ARSO integration: {} (station {}, region {})",
            entity_id, self.station.id, self.station.forecast_region
        );

        tx.send(FromIntegrationMessage::EntityDiscovered {
            entity_id,
            platform,
            integration_name: self.name().to_string(),
        })
        .await
        .map_err(|e| -> Box<dyn Error + Send> { Box::new(e) })?;

        if let Some(previous) = self.poll_task.take() {
            warn!("ARSO integration already running, restarting poll task");
            previous.abort();
        }

        let client = self.client.clone();
        let station = self.station.clone();
        let parser = self.parser;
        let weather = self.weather.clone();

        let task = tokio::spawn(async move {
            Self::run_poll_loop(client, station, parser, weather, tx).await;
        });
        self.poll_task = Some(task);

        info!(
            "ARSO integration polling every {}s",
            self.station.scan_interval_secs
        );
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), Box<dyn Error + Send>> {
        info!("ARSO integration shutting down");
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        Ok(())
    }
}
