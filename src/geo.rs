use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::GeocodeError;
use crate::model::VacancyRecord;
use crate::settings::Settings;
use crate::stats::{self, MISSING};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

pub const MOSCOW: Coordinates = Coordinates {
    lat: 55.7522,
    lon: 37.6156,
};

/// Place name to coordinates.
pub trait Geocoder {
    fn locate(&self, place: &str) -> Result<Coordinates, GeocodeError>;
}

/// Nominatim (OpenStreetMap) search API.
pub struct NominatimGeocoder {
    client: Client,
    url: String,
    user_agent: String,
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &Settings) -> Result<Self, GeocodeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: settings.geocoder_url.clone(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn locate(&self, place: &str) -> Result<Coordinates, GeocodeError> {
        let found: Vec<Place> = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json()?;

        let first = found
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(place.to_string()))?;
        let coord = |raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| GeocodeError::Coordinate(raw.to_string()))
        };
        Ok(Coordinates {
            lat: coord(&first.lat)?,
            lon: coord(&first.lon)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub city: String,
    pub vacancies: usize,
    pub position: Coordinates,
    pub radius: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMap {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<CircleMarker>,
}

/// Marker radius and fill colour for a city with `n` vacancies.
///
/// Bands are contiguous: exactly 1000 is orange, not white.
pub fn marker_style(n: usize) -> (u32, &'static str) {
    match n {
        n if n > 1000 => (20, "red"),
        500..=1000 => (15, "orange"),
        100..=499 => (12, "yellow"),
        10..=99 => (8, "green"),
        _ => (4, "white"),
    }
}

/// One marker per city, busiest first. Cities the geocoder cannot place are left off.
pub fn build_city_map<G: Geocoder + ?Sized>(records: &[VacancyRecord], geocoder: &G) -> CityMap {
    let mut markers = Vec::new();
    for (city, vacancies) in stats::by_city(records) {
        if city == MISSING {
            continue;
        }
        match geocoder.locate(&city) {
            Ok(position) => {
                let (radius, color) = marker_style(vacancies);
                markers.push(CircleMarker {
                    city,
                    vacancies,
                    position,
                    radius,
                    color,
                });
            }
            Err(e) => warn!(%city, error = %e, "Geocoding failed, city left off the map"),
        }
    }
    info!(cities = markers.len(), "Built city map");

    CityMap {
        center: MOSCOW,
        zoom: 4,
        markers,
    }
}

impl CityMap {
    /// GeoJSON FeatureCollection; marker styling goes in each feature's properties.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [m.position.lon, m.position.lat],
                    },
                    "properties": {
                        "tooltip": m.city,
                        "popup": m.vacancies.to_string(),
                        "radius": m.radius,
                        "fill_color": m.color,
                        "fill_opacity": 0.9,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "properties": {
                "center": [self.center.lat, self.center.lon],
                "zoom": self.zoom,
            },
            "features": features,
        })
    }
}
