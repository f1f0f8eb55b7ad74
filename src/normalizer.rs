//! Normalización de filas de bindings a registros de gadget.
//!
//! Función pura y total: ningún valor malformado se propaga como error, todo
//! campo degrada a su representación vacía documentada. Las reglas, por fila:
//!   1. Resolución de etiquetas con cadena de fallback (label → fragmento
//!      tras `#` → "Unknown").
//!   2. Coerción numérica estilo parseInt (dígitos iniciales, por defecto en
//!      fallo).
//!   3. Coerción booleana: "true"/"1" (sin distinguir mayúsculas), el resto
//!      false.
//!   4. Tabla ordenada de extracción sobre gad:keyFeature cuando falta el
//!      campo estructurado; lo estructurado siempre gana.
//!   5. Derivación de etiquetas de requisito, espejo exacto del UNION de la
//!      consulta, fusionada sin duplicados con lo que ya trajera ?requirements.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{GadgetRecord, RawBindingRow};

// --- Tabla de extracción sobre texto libre (patrón → campo) ---

static RE_LEADING_FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?").unwrap());
static RE_PLAYBACK_HOURS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s*(?:hours?|jam|h)\b").unwrap());
static RE_REFRESH_HZ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*hz\b").unwrap());
static RE_CAMERA_MP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s*mp\b").unwrap());
static RE_FLIGHT_MIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s*(?:min|menit)\b").unwrap());
static RE_NOISE_CANCEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)noise.?cancel|\banc\b").unwrap());

/// Vocabulario de paneles; AMOLED antes que OLED porque lo contiene.
const PANEL_VOCABULARY: [&str; 5] = ["AMOLED", "Mini-LED", "OLED", "IPS", "LCD"];

/// Normaliza todas las filas. Nunca falla y nunca deja un campo sin
/// representación definida.
pub fn normalize(rows: Vec<RawBindingRow>) -> Vec<GadgetRecord> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row))
        .collect()
}

fn normalize_row(index: usize, row: RawBindingRow) -> GadgetRecord {
    let id = row
        .id
        .clone()
        .unwrap_or_else(|| index.to_string());
    let name = resolve_label(row.name.as_deref(), row.id.as_deref());
    let category_label = resolve_label(row.category_label.as_deref(), row.category.as_deref());
    let brand_name = resolve_label(row.brand_name.as_deref(), row.brand.as_deref());

    let key_feature = row.key_feature.clone().unwrap_or_default();
    let text = (!key_feature.is_empty()).then_some(key_feature.as_str());
    let mut derived_fields: Vec<&'static str> = Vec::new();

    // Campos con fallback texto-libre: el valor estructurado tiene prioridad.
    let playback_hours = match row.battery_life_hours.as_deref().and_then(coerce_float) {
        Some(hours) => Some(hours),
        None => text.and_then(extract_playback_hours).map(|hours| {
            derived_fields.push("playbackHours");
            hours
        }),
    };

    let display_panel = match row.display_panel.as_deref().filter(|p| !p.is_empty()) {
        Some(panel) => panel.to_string(),
        None => text
            .and_then(extract_panel)
            .map(|panel| {
                derived_fields.push("displayPanel");
                panel.to_string()
            })
            .unwrap_or_default(),
    };

    let refresh_rate_hz = match row.refresh_rate_hz.as_deref().and_then(coerce_int) {
        Some(hz) => u32::try_from(hz).ok(),
        None => text.and_then(extract_refresh_hz).map(|hz| {
            derived_fields.push("refreshRateHz");
            hz
        }),
    };

    let camera_mp = match row.camera_mp.clone() {
        Some(mp) => Some(mp),
        None => text.and_then(extract_camera_mp).map(|mp| {
            derived_fields.push("cameraMP");
            mp
        }),
    };

    let flight_time = match row.flight_time.as_deref().and_then(coerce_float) {
        Some(minutes) => Some(minutes),
        None => text.and_then(extract_flight_minutes).map(|minutes| {
            derived_fields.push("flightTime");
            minutes
        }),
    };

    let has_4k = match row.video_4k.as_deref() {
        Some(value) => coerce_bool(value),
        None => {
            let found = text.is_some_and(|t| t.to_lowercase().contains("4k"));
            if found {
                derived_fields.push("video4k");
            }
            found
        }
    };

    let noise_cancellation = match row.noise_cancellation.as_deref() {
        Some(value) => coerce_bool(value),
        None => {
            let found = text.is_some_and(|t| RE_NOISE_CANCEL.is_match(t));
            if found {
                derived_fields.push("noiseCancellation");
            }
            found
        }
    };

    let mut record = GadgetRecord {
        id,
        name,
        category_label,
        brand_name,
        os: row.os.clone().unwrap_or_else(|| "-".to_string()),
        ram: row.ram.as_deref().and_then(coerce_int).unwrap_or(0),
        ram_tech: row.ram_tech.clone().unwrap_or_default(),
        storage: row.storage.as_deref().and_then(coerce_int).unwrap_or(0),
        storage_tech: row.storage_tech.clone().unwrap_or_default(),
        price: row.price.as_deref().and_then(coerce_int).unwrap_or(0),
        flight_time,
        battery: row.battery.as_deref().and_then(coerce_int),
        battery_wh: row.battery_wh.as_deref().and_then(coerce_float),
        playback_hours,
        camera_mp,
        sensor_format: row.sensor_format.clone().unwrap_or_default(),
        has_ibis: row.ibis.as_deref().is_some_and(coerce_bool),
        has_4k,
        noise_cancellation,
        display_panel,
        refresh_rate_hz,
        key_feature,
        available_color: row.available_color.clone().unwrap_or_default(),
        release_year: row
            .release_year
            .as_deref()
            .and_then(coerce_int)
            .and_then(|y| i32::try_from(y).ok()),
        weight_gr: row.weight_gr.as_deref().and_then(coerce_int).unwrap_or(0),
        body_material: row.body_material.clone().unwrap_or_default(),
        vram: row.vram.as_deref().and_then(coerce_int).unwrap_or(0),
        supports_cuda: row.supports_cuda.as_deref().is_some_and(coerce_bool),
        supports_npu: row.supports_npu.as_deref().is_some_and(coerce_bool),
        requirements: String::new(),
        derived_fields,
    };

    record.requirements = requirements_string(&record, row.requirements.as_deref());
    record
}

// --- Coerciones escalares ---

/// Coerción entera estilo parseInt: dígitos iniciales tras recortar espacios;
/// sin dígitos iniciales, None. Idempotente sobre su propia salida.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits: &str = {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(trimmed.len(), |(i, _)| i);
        &trimmed[..end]
    };
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Coerción a float: parte numérica inicial, aceptando coma decimal.
pub fn coerce_float(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    RE_LEADING_FLOAT
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
}

/// Un valor es true solo si es "true" o "1" (sin distinguir mayúsculas).
pub fn coerce_bool(raw: &str) -> bool {
    let value = raw.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

// --- Resolución de etiquetas ---

fn resolve_label(label: Option<&str>, resource: Option<&str>) -> String {
    if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
        return label.to_string();
    }
    resource
        .and_then(fragment)
        .unwrap_or("Unknown")
        .to_string()
}

/// Fragmento de un IRI: lo que sigue al último `#`.
fn fragment(iri: &str) -> Option<&str> {
    iri.rsplit_once('#')
        .map(|(_, frag)| frag)
        .filter(|frag| !frag.is_empty())
}

// --- Extractores sobre texto libre ---

fn extract_playback_hours(text: &str) -> Option<f64> {
    RE_PLAYBACK_HOURS
        .captures(text)
        .and_then(|caps| coerce_float(&caps[1]))
}

fn extract_panel(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    PANEL_VOCABULARY
        .iter()
        .find(|panel| lowered.contains(&panel.to_lowercase()))
        .copied()
}

fn extract_refresh_hz(text: &str) -> Option<u32> {
    RE_REFRESH_HZ
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

fn extract_camera_mp(text: &str) -> Option<String> {
    RE_CAMERA_MP
        .captures(text)
        .map(|caps| caps[1].replace(',', "."))
}

fn extract_flight_minutes(text: &str) -> Option<f64> {
    RE_FLIGHT_MIN
        .captures(text)
        .and_then(|caps| coerce_float(&caps[1]))
}

// --- Derivación de etiquetas de requisito ---

/// Espejo cliente del UNION de la consulta. Se mantiene sincronizado con
/// `query.rs`: mismo umbral, misma etiqueta, misma semántica de ausencia.
fn derive_requirement_tags(record: &GadgetRecord) -> Vec<&'static str> {
    let mut tags = Vec::new();
    let camera_mp = record
        .camera_mp
        .as_deref()
        .and_then(coerce_float)
        .unwrap_or(0.0);
    let category = record.category_label.to_lowercase();

    if record.supports_cuda && record.vram >= 8 {
        tags.push("Training_Model_AI");
    }
    if record.supports_cuda {
        tags.push("Advanced_AI_Training");
    }
    if record.ram >= 16 && record.storage >= 512 {
        tags.push("Video_Editing");
    }
    if record.vram >= 6 {
        tags.push("Gaming_1440p");
    }
    let mobile_build = match record.battery_wh {
        Some(wh) => wh >= 50.0,
        None => record.battery.is_some_and(|mah| mah >= 5000),
    };
    if mobile_build {
        tags.push("Mobile_Build");
    }
    if camera_mp >= 48.0 || record.has_4k {
        tags.push("Mobile_Photo_Video");
    }
    if record.price >= 15_000_000 {
        tags.push("Premium_Device_Status");
    }
    if category.contains("drone") {
        tags.push("Aerial_Videography");
    }
    if category.contains("watch") || category.contains("band") {
        tags.push("Wrist_Health_Tracking");
    }

    tags
}

/// Une las etiquetas derivadas con las que ya trajera la consulta,
/// deduplicando y conservando el primer orden de aparición.
fn requirements_string(record: &GadgetRecord, from_query: Option<&str>) -> String {
    let mut tags: Vec<String> = Vec::new();
    for tag in derive_requirement_tags(record) {
        push_unique(&mut tags, tag);
    }
    if let Some(joined) = from_query {
        for tag in joined.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            push_unique(&mut tags, tag);
        }
    }
    tags.join(", ")
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
    }
}
