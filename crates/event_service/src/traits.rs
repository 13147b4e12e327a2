//! Upstream source traits.
//!
//! The loader and weather service talk to the network through these traits
//! so tests can substitute in-memory sources.

use async_trait::async_trait;
use external_services::eonet::{EonetClient, EventQuery, RawEvent};
use external_services::open_meteo::{OpenMeteoClient, WeatherReport};

/// A source of raw hazard events.
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl EventSource for MyFeed {
///     fn source_name(&self) -> &'static str {
///         "my-feed"
///     }
///
///     async fn fetch_events(&self, query: &EventQuery) -> external_services::Result<Vec<RawEvent>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Source name used in logs and metric labels.
    fn source_name(&self) -> &'static str;

    /// Fetch raw events matching the query, in feed order.
    async fn fetch_events(&self, query: &EventQuery) -> external_services::Result<Vec<RawEvent>>;
}

/// A source of point weather reports.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> external_services::Result<WeatherReport>;
}

#[async_trait]
impl EventSource for EonetClient {
    fn source_name(&self) -> &'static str {
        "eonet"
    }

    async fn fetch_events(&self, query: &EventQuery) -> external_services::Result<Vec<RawEvent>> {
        let response = EonetClient::fetch_events(self, query).await?;
        Ok(response.events)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    fn source_name(&self) -> &'static str {
        "open-meteo"
    }

    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> external_services::Result<WeatherReport> {
        OpenMeteoClient::fetch_weather(self, latitude, longitude).await
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory sources with scripted replies.

    use super::*;
    use external_services::open_meteo::{CurrentBlock, DailyBlock, ForecastResponse};
    use external_services::Error;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    enum Reply {
        Ready(external_services::Result<Vec<RawEvent>>),
        Deferred(oneshot::Receiver<Vec<RawEvent>>),
    }

    /// Event source replaying queued replies in call order.
    ///
    /// Once the queue is exhausted every fetch returns an empty feed.
    #[derive(Default)]
    pub struct FakeEventSource {
        replies: Mutex<VecDeque<Reply>>,
        queries: Mutex<Vec<EventQuery>>,
    }

    impl FakeEventSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_ok(&self, events: Vec<RawEvent>) {
            self.replies.lock().unwrap().push_back(Reply::Ready(Ok(events)));
        }

        pub fn push_err(&self, error: Error) {
            self.replies.lock().unwrap().push_back(Reply::Ready(Err(error)));
        }

        /// Queue a reply that resolves when the returned sender fires.
        pub fn defer(&self) -> oneshot::Sender<Vec<RawEvent>> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push_back(Reply::Deferred(rx));
            tx
        }

        pub fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        pub fn last_query(&self) -> Option<EventQuery> {
            self.queries.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl EventSource for FakeEventSource {
        fn source_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_events(
            &self,
            query: &EventQuery,
        ) -> external_services::Result<Vec<RawEvent>> {
            let reply = self.replies.lock().unwrap().pop_front();
            self.queries.lock().unwrap().push(query.clone());

            match reply {
                Some(Reply::Ready(result)) => result,
                Some(Reply::Deferred(rx)) => rx
                    .await
                    .map_err(|_| Error::InvalidResponse("reply dropped".to_string())),
                None => Ok(Vec::new()),
            }
        }
    }

    /// Weather source that answers every location, or fails with a status.
    #[derive(Default)]
    pub struct FakeWeatherSource {
        fail_with: Option<u16>,
        lookups: Mutex<Vec<(f64, f64)>>,
    }

    impl FakeWeatherSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Default::default()
            }
        }

        pub fn lookups(&self) -> Vec<(f64, f64)> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherSource for FakeWeatherSource {
        fn source_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_weather(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> external_services::Result<WeatherReport> {
            self.lookups.lock().unwrap().push((latitude, longitude));

            if let Some(status) = self.fail_with {
                return Err(Error::Api {
                    status,
                    message: "upstream unavailable".to_string(),
                });
            }
            WeatherReport::from_forecast(&sample_forecast(latitude, longitude))
        }
    }

    pub fn sample_forecast(latitude: f64, longitude: f64) -> ForecastResponse {
        ForecastResponse {
            latitude,
            longitude,
            timezone: Some("GMT".to_string()),
            current: CurrentBlock {
                time: "2024-07-01T12:00".to_string(),
                temperature_2m: 21.5,
                relative_humidity_2m: 55.0,
                apparent_temperature: 20.4,
                is_day: 1,
                precipitation: 0.0,
                rain: 0.0,
                showers: 0.0,
                snowfall: 0.0,
                weather_code: 3,
                cloud_cover: 80.0,
                pressure_msl: 1012.3,
                wind_speed_10m: 5.0,
                wind_direction_10m: 90.0,
                wind_gusts_10m: 10.0,
            },
            daily: DailyBlock {
                time: vec!["2024-07-01".to_string(), "2024-07-02".to_string()],
                weather_code: vec![3, 61],
                temperature_2m_max: vec![24.2, 19.5],
                temperature_2m_min: vec![15.1, 13.8],
                precipitation_sum: vec![0.0, 4.1],
            },
        }
    }
}
