//! Modelos de dominio: fila de bindings validada y registro de gadget
//! normalizado tal y como lo consume el frontend.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::sparql::BindingRow;

/// Fila cruda de la consulta de catálogo, con el conjunto cerrado de
/// variables del SELECT. Cada campo es opcional por fila (las variables
/// OPTIONAL pueden no ligar); una variable fuera de este conjunto se rechaza
/// en la frontera en lugar de propagarse en silencio.
#[derive(Debug, Clone, Default)]
pub struct RawBindingRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub category_label: Option<String>,
    pub brand: Option<String>,
    pub brand_name: Option<String>,
    pub os: Option<String>,
    pub ram: Option<String>,
    pub ram_tech: Option<String>,
    pub storage: Option<String>,
    pub storage_tech: Option<String>,
    pub price: Option<String>,
    pub flight_time: Option<String>,
    pub battery: Option<String>,
    pub battery_wh: Option<String>,
    pub battery_life_hours: Option<String>,
    pub camera_mp: Option<String>,
    pub sensor_format: Option<String>,
    pub ibis: Option<String>,
    pub video_4k: Option<String>,
    pub noise_cancellation: Option<String>,
    pub display_panel: Option<String>,
    pub refresh_rate_hz: Option<String>,
    pub key_feature: Option<String>,
    pub available_color: Option<String>,
    pub release_year: Option<String>,
    pub weight_gr: Option<String>,
    pub body_material: Option<String>,
    pub vram: Option<String>,
    pub supports_cuda: Option<String>,
    pub supports_npu: Option<String>,
    pub requirements: Option<String>,
}

impl RawBindingRow {
    /// Convierte el mapa variable → valor del gateway en el registro tipado.
    /// Falla si la consulta proyectó una variable que no forma parte del
    /// contrato conocido.
    pub fn from_bindings(bindings: BindingRow) -> Result<Self> {
        let mut row = Self::default();
        for (variable, value) in bindings {
            let slot = match variable.as_str() {
                "id" => &mut row.id,
                "name" => &mut row.name,
                "category" => &mut row.category,
                "categoryLabel" => &mut row.category_label,
                "brand" => &mut row.brand,
                "brandName" => &mut row.brand_name,
                "os" => &mut row.os,
                "ram" => &mut row.ram,
                "ramTech" => &mut row.ram_tech,
                "storage" => &mut row.storage,
                "storageTech" => &mut row.storage_tech,
                "price" => &mut row.price,
                "flightTime" => &mut row.flight_time,
                "battery" => &mut row.battery,
                "batteryWh" => &mut row.battery_wh,
                "batteryLifeHours" => &mut row.battery_life_hours,
                "cameraMP" => &mut row.camera_mp,
                "sensorFormat" => &mut row.sensor_format,
                "ibis" => &mut row.ibis,
                "video4k" => &mut row.video_4k,
                "noiseCancellation" => &mut row.noise_cancellation,
                "displayPanel" => &mut row.display_panel,
                "refreshRateHz" => &mut row.refresh_rate_hz,
                "keyFeature" => &mut row.key_feature,
                "availableColor" => &mut row.available_color,
                "releaseYear" => &mut row.release_year,
                "weightGr" => &mut row.weight_gr,
                "bodyMaterial" => &mut row.body_material,
                "vram" => &mut row.vram,
                "supportsCUDA" => &mut row.supports_cuda,
                "supportsNPU" => &mut row.supports_npu,
                "requirements" => &mut row.requirements,
                other => bail!("variable inesperada en la proyección: {other}"),
            };
            // La última ligadura observada gana si el motor repitiera la variable.
            *slot = Some(value);
        }
        Ok(row)
    }
}

/// Registro de gadget normalizado. Todos los campos tienen representación
/// vacía definida: los strings nunca son null, los tamaños/precios en
/// ausencia valen 0, y las cantidades donde "desconocido" ≠ 0 van como
/// Option (serializado null).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GadgetRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "categoryLabel")]
    pub category_label: String,
    #[serde(rename = "brandName")]
    pub brand_name: String,
    pub os: String,
    pub ram: i64,
    #[serde(rename = "ramTech")]
    pub ram_tech: String,
    pub storage: i64,
    #[serde(rename = "storageTech")]
    pub storage_tech: String,
    pub price: i64,
    #[serde(rename = "flightTime")]
    pub flight_time: Option<f64>,
    /// Capacidad en mAh (clave `battery` del contrato).
    pub battery: Option<i64>,
    #[serde(rename = "batteryWh")]
    pub battery_wh: Option<f64>,
    #[serde(rename = "playbackHours")]
    pub playback_hours: Option<f64>,
    #[serde(rename = "cameraMP")]
    pub camera_mp: Option<String>,
    #[serde(rename = "sensorFormat")]
    pub sensor_format: String,
    #[serde(rename = "ibis")]
    pub has_ibis: bool,
    #[serde(rename = "video4k")]
    pub has_4k: bool,
    #[serde(rename = "noiseCancellation")]
    pub noise_cancellation: bool,
    #[serde(rename = "displayPanel")]
    pub display_panel: String,
    #[serde(rename = "refreshRateHz")]
    pub refresh_rate_hz: Option<u32>,
    #[serde(rename = "keyFeature")]
    pub key_feature: String,
    #[serde(rename = "availableColor")]
    pub available_color: String,
    #[serde(rename = "releaseYear")]
    pub release_year: Option<i32>,
    #[serde(rename = "weightGr")]
    pub weight_gr: i64,
    #[serde(rename = "bodyMaterial")]
    pub body_material: String,
    pub vram: i64,
    #[serde(rename = "supportsCUDA")]
    pub supports_cuda: bool,
    #[serde(rename = "supportsNPU")]
    pub supports_npu: bool,
    /// Etiquetas de requisito deduplicadas y unidas con ", " ("" si no hay).
    pub requirements: String,
    /// Procedencia: campos que salieron de la extracción sobre texto libre
    /// en lugar de un valor estructurado. No viaja por la API.
    #[serde(skip)]
    pub derived_fields: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_known_variables_are_accepted() {
        let mut bindings = HashMap::new();
        bindings.insert("id".to_string(), "http://example.org/gadgetic#X".to_string());
        bindings.insert("name".to_string(), "X".to_string());
        bindings.insert("ram".to_string(), "16".to_string());
        bindings.insert("supportsCUDA".to_string(), "true".to_string());

        let row = RawBindingRow::from_bindings(bindings).unwrap();
        assert_eq!(row.name.as_deref(), Some("X"));
        assert_eq!(row.ram.as_deref(), Some("16"));
        assert_eq!(row.supports_cuda.as_deref(), Some("true"));
        assert!(row.os.is_none());
    }

    #[test]
    fn test_unexpected_variable_is_rejected() {
        let mut bindings = HashMap::new();
        bindings.insert("name".to_string(), "X".to_string());
        bindings.insert("sorpresa".to_string(), "y".to_string());

        let err = RawBindingRow::from_bindings(bindings).unwrap_err();
        assert!(err.to_string().contains("sorpresa"));
    }

    #[test]
    fn test_empty_row_is_all_absent() {
        let row = RawBindingRow::from_bindings(HashMap::new()).unwrap();
        assert!(row.id.is_none());
        assert!(row.requirements.is_none());
    }
}
