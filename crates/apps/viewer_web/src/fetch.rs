use formats::cities::CityIndex;
use formats::countries::CountryBoundaries;
use gloo_net::http::Request;

async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = Request::get(url).send().await.map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {} for {url}", resp.status()));
    }
    resp.text().await.map_err(|e| e.to_string())
}

pub async fn fetch_cities(url: &str) -> Result<CityIndex, String> {
    let text = fetch_text(url).await?;
    CityIndex::from_json_str(&text).map_err(|e| e.to_string())
}

/// Parsed boundaries plus the raw GeoJSON, which the page draws as-is.
pub async fn fetch_countries(url: &str) -> Result<(CountryBoundaries, String), String> {
    let text = fetch_text(url).await?;
    let countries = CountryBoundaries::from_geojson_str(&text).map_err(|e| e.to_string())?;
    Ok((countries, text))
}
