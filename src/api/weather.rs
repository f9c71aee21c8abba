//! Weather report with air quality and generated insights.

// self
use crate::{
	_prelude::*,
	endpoint::ApiRoute,
	flows::NewsClient,
	http::{ApiRequest, ApiTransport},
};

/// Location a weather report is requested for.
#[derive(Clone, Debug, PartialEq)]
pub enum WeatherQuery {
	/// Geographic coordinates.
	Coordinates {
		/// Latitude in decimal degrees.
		lat: f64,
		/// Longitude in decimal degrees.
		lon: f64,
	},
	/// City name.
	City(String),
}
impl WeatherQuery {
	fn pairs(&self) -> Vec<(&'static str, String)> {
		match self {
			Self::Coordinates { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
			Self::City(name) => vec![("city", name.trim().to_owned())],
		}
	}
}

/// Full weather report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
	/// Current conditions.
	pub current: CurrentWeather,
	/// Multi-day forecast.
	pub forecast: Forecast,
	/// Air quality readings.
	pub air_pollution: AirPollution,
	/// Generated commentary.
	pub ai_insights: AiInsights,
}

/// Current conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
	/// Resolved city name.
	pub city: String,
	/// Temperature in degrees Celsius.
	pub temperature: f64,
	/// Short description (e.g., `light rain`).
	pub description: String,
	/// Relative humidity, percent.
	pub humidity: f64,
	/// Wind speed, meters per second.
	pub wind_speed: f64,
}

/// Forecast for the resolved city.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
	/// Resolved city name.
	pub city: String,
	/// Forecast entries.
	pub forecast_data: Vec<ForecastEntry>,
}

/// One forecast entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
	/// Date label as served by the backend.
	pub date: String,
	/// Temperature in degrees Celsius.
	pub temperature: f64,
	/// Short description.
	pub description: String,
}

/// Air quality index and pollutant concentrations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirPollution {
	/// Air quality index (1 = good … 5 = very poor).
	pub aqi: u8,
	/// Concentrations in μg/m³.
	pub components: PollutantLevels,
}

/// Pollutant concentrations in μg/m³.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollutantLevels {
	/// Carbon monoxide.
	pub co: f64,
	/// Nitrogen monoxide.
	pub no: f64,
	/// Nitrogen dioxide.
	pub no2: f64,
	/// Ozone.
	pub o3: f64,
	/// Sulphur dioxide.
	pub so2: f64,
	/// Fine particulate matter.
	pub pm2_5: f64,
	/// Coarse particulate matter.
	pub pm10: f64,
	/// Ammonia.
	pub nh3: f64,
}

/// Generated commentary grouped by topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
	/// Summary of the current conditions.
	pub weather_summary: WeatherSummary,
	/// Health advice.
	pub health_recommendations: HealthRecommendations,
	/// Air quality interpretation.
	pub air_quality_analysis: AirQualityAnalysis,
	/// Forecast interpretation.
	pub forecast_insights: ForecastInsights,
	/// Travel advice.
	pub travel_recommendations: TravelRecommendations,
}

/// Summary of the current conditions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
	/// Plain-language description of the sky and wind.
	pub current_conditions: String,
	/// Temperature band, such as `mild` or `hot`.
	pub temperature_category: String,
	/// How the conditions feel outdoors.
	pub comfort_level: String,
}

/// Health advice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthRecommendations {
	/// Suitability for outdoor activity, higher is better.
	pub outdoor_activity_score: f64,
	/// Activities that suit the conditions.
	#[serde(default)]
	pub recommended_activities: Vec<String>,
	/// Risks worth knowing about.
	#[serde(default)]
	pub health_risks: Vec<String>,
	/// Suggested precautions.
	#[serde(default)]
	pub precautions: Vec<String>,
}

/// Air quality interpretation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityAnalysis {
	/// Air quality band.
	pub category: String,
	/// Pollutants driving the index.
	#[serde(default)]
	pub main_pollutants: Vec<String>,
	/// Expected effect on health.
	pub health_impact: String,
	/// Suggested responses to the air quality.
	#[serde(default)]
	pub recommended_actions: Vec<String>,
}

/// Forecast interpretation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastInsights {
	/// Direction of temperatures over the forecast window.
	pub temperature_trend: String,
	/// Dominant pattern over the forecast window.
	pub weather_pattern: String,
	/// Shifts worth calling out.
	#[serde(default)]
	pub notable_changes: Vec<String>,
	/// Outlook for the coming weekend.
	pub weekend_outlook: String,
}

/// Travel advice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelRecommendations {
	/// Whether outdoor plans are advisable.
	pub outdoor_activities_suitable: bool,
	/// Best window for being outside.
	pub best_time_for_outdoors: String,
	/// What to wear.
	#[serde(default)]
	pub clothing_suggestions: Vec<String>,
	/// Precautions for travel.
	#[serde(default)]
	pub travel_precautions: Vec<String>,
}

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Loads the weather report for a location.
	pub async fn weather(&self, query: &WeatherQuery) -> Result<WeatherReport> {
		let url = self.descriptor().url(ApiRoute::Weather)?;

		self.fetch_json(ApiRequest::get(url).query(query.pairs())).await
	}
}
