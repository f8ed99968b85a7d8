use colored::Colorize;

use crate::error::NetatmoError;
use crate::types::{DashboardData, DeviceCollection};

pub fn print_stations(collection: &DeviceCollection, is_tty: bool) {
    if collection.devices().is_empty() {
        println!("No stations found.");
        return;
    }

    for device in collection.devices() {
        let name = device.display_name();
        if is_tty {
            println!("{}", name.bold());
        } else {
            println!("{name}");
        }
        print_readings(
            device.module_name.as_deref().unwrap_or("Base station"),
            device.dashboard_data.as_ref(),
            device.reachable,
            is_tty,
        );
        for module in &device.modules {
            print_readings(
                module.display_name(),
                module.dashboard_data.as_ref(),
                module.reachable,
                is_tty,
            );
        }
    }
}

fn print_readings(
    name: &str,
    data: Option<&DashboardData>,
    reachable: Option<bool>,
    is_tty: bool,
) {
    let line = match data {
        Some(data) if reachable != Some(false) => format_dashboard(data),
        _ => "unreachable".to_string(),
    };
    if is_tty && line == "unreachable" {
        println!("  {}: {}", name, line.dimmed());
    } else {
        println!("  {name}: {line}");
    }
}

/// One-line summary of whatever measurements a module reports.
pub fn format_dashboard(data: &DashboardData) -> String {
    let mut parts = Vec::new();
    if let Some(t) = data.temperature {
        parts.push(format!("{t:.1}°C"));
    }
    if let Some(h) = data.humidity {
        parts.push(format!("{h:.0}%"));
    }
    if let Some(co2) = data.co2 {
        parts.push(format!("{co2:.0}ppm CO2"));
    }
    if let Some(noise) = data.noise {
        parts.push(format!("{noise:.0}dB"));
    }
    if let Some(p) = data.pressure {
        parts.push(format!("{p:.1}mbar"));
    }
    if let Some(rain) = data.rain {
        parts.push(format!("{rain:.1}mm rain"));
    }
    if let Some(wind) = data.wind_strength {
        match data.wind_angle {
            Some(angle) => parts.push(format!("wind {wind:.0}km/h @ {angle:.0}°")),
            None => parts.push(format!("wind {wind:.0}km/h")),
        }
    }
    if parts.is_empty() {
        "no data".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn print_error(err: &NetatmoError, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&err.to_json()).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_indoor_readings() {
        let data = DashboardData {
            temperature: Some(21.46),
            humidity: Some(45.0),
            co2: Some(612.0),
            noise: Some(38.0),
            pressure: Some(1013.24),
            ..Default::default()
        };
        assert_eq!(
            format_dashboard(&data),
            "21.5°C, 45%, 612ppm CO2, 38dB, 1013.2mbar"
        );
    }

    #[test]
    fn format_wind_readings() {
        let data = DashboardData {
            wind_strength: Some(12.0),
            wind_angle: Some(270.0),
            ..Default::default()
        };
        assert_eq!(format_dashboard(&data), "wind 12km/h @ 270°");
    }

    #[test]
    fn format_empty_dashboard() {
        assert_eq!(format_dashboard(&DashboardData::default()), "no data");
    }
}
