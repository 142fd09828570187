use weather_report_core::{
    WeatherReport,
    format::{local_time_12h, rounded_uv, speed_label, temperature_label, wind_direction_label},
};

/// Human-readable block for one report.
pub fn render_report(report: &WeatherReport) -> String {
    let temp_unit = temperature_label(report.units);
    let direction = match wind_direction_label(report.wind_direction_deg) {
        "" => String::new(),
        label => format!(" ({label})"),
    };

    format!(
        "{name} {country}\n\
         \x20 {summary}  [{icon}]\n\
         \x20 Temperature: {temp:.1}{temp_unit} (feels like {feels:.1}{temp_unit})\n\
         \x20 Humidity:    {humidity}%\n\
         \x20 Wind:        {speed:.1} {speed_unit}{direction}\n\
         \x20 Pressure:    {pressure}hPa\n\
         \x20 Sunrise:     {sunrise}\n\
         \x20 Sunset:      {sunset}\n\
         \x20 UV Index:    {uv}\n\
         \x20 Map:         {lat:.4}, {lon:.4}",
        name = report.name,
        country = report.country,
        summary = report.condition_summary,
        icon = report.icon_ref,
        temp = report.temp,
        feels = report.feels_like,
        humidity = report.humidity,
        speed = report.wind_speed,
        speed_unit = speed_label(report.units),
        pressure = report.pressure,
        sunrise = local_time_12h(report.sunrise, report.timezone_offset_seconds),
        sunset = local_time_12h(report.sunset, report.timezone_offset_seconds),
        uv = rounded_uv(report.uv_index),
        lat = report.lat,
        lon = report.lon,
    )
}
