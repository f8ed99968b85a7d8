use serde::{Deserialize, Serialize};

/// Response of the `getstationsdata` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCollection {
    pub body: DeviceBody,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub time_exec: Option<f64>,
    #[serde(default)]
    pub time_server: Option<i64>,
}

impl DeviceCollection {
    pub fn devices(&self) -> &[Device] {
        &self.body.devices
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceBody {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub user: Option<User>,
}

/// A base station with its attached modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub data_type: Vec<String>,
    #[serde(default)]
    pub reachable: Option<bool>,
    #[serde(default)]
    pub firmware: Option<i64>,
    #[serde(default)]
    pub wifi_status: Option<i64>,
    #[serde(default)]
    pub place: Option<Place>,
    #[serde(default)]
    pub dashboard_data: Option<DashboardData>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Device {
    /// Station name if set, the module name or id otherwise.
    pub fn display_name(&self) -> &str {
        self.station_name
            .as_deref()
            .or(self.module_name.as_deref())
            .unwrap_or(&self.id)
    }
}

/// An outdoor, rain, wind or additional indoor module paired with a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(rename = "type", default)]
    pub module_type: String,
    #[serde(default)]
    pub data_type: Vec<String>,
    #[serde(default)]
    pub reachable: Option<bool>,
    #[serde(default)]
    pub battery_percent: Option<i64>,
    #[serde(default)]
    pub rf_status: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub dashboard_data: Option<DashboardData>,
}

impl Module {
    pub fn display_name(&self) -> &str {
        self.module_name.as_deref().unwrap_or(&self.id)
    }
}

/// Latest measurements. Which fields are present depends on the module type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub time_utc: Option<i64>,
    #[serde(rename = "Temperature", default)]
    pub temperature: Option<f64>,
    #[serde(rename = "Humidity", default)]
    pub humidity: Option<f64>,
    #[serde(rename = "CO2", default)]
    pub co2: Option<f64>,
    #[serde(rename = "Noise", default)]
    pub noise: Option<f64>,
    #[serde(rename = "Pressure", default)]
    pub pressure: Option<f64>,
    #[serde(rename = "AbsolutePressure", default)]
    pub absolute_pressure: Option<f64>,
    #[serde(default)]
    pub min_temp: Option<f64>,
    #[serde(default)]
    pub max_temp: Option<f64>,
    #[serde(default)]
    pub temp_trend: Option<String>,
    #[serde(default)]
    pub pressure_trend: Option<String>,
    #[serde(rename = "Rain", default)]
    pub rain: Option<f64>,
    #[serde(default)]
    pub sum_rain_1: Option<f64>,
    #[serde(default)]
    pub sum_rain_24: Option<f64>,
    #[serde(rename = "WindStrength", default)]
    pub wind_strength: Option<f64>,
    #[serde(rename = "WindAngle", default)]
    pub wind_angle: Option<f64>,
    #[serde(rename = "GustStrength", default)]
    pub gust_strength: Option<f64>,
    #[serde(rename = "GustAngle", default)]
    pub gust_angle: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default)]
    pub location: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub administrative: Option<Administrative>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Administrative {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub reg_locale: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// 0 = metric, 1 = imperial.
    #[serde(default)]
    pub unit: Option<i64>,
    #[serde(default)]
    pub windunit: Option<i64>,
    #[serde(default)]
    pub pressureunit: Option<i64>,
}
