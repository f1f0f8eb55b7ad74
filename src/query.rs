//! Constructor de la consulta de catálogo.
//!
//! Una única consulta configurable sustituye a las variantes duplicadas del
//! endpoint original: el alcance decide si se devuelve el catálogo completo o
//! solo los gadgets recomendados para creadores de contenido. Las metas de
//! uso (SWRL simuladas) se calculan en la propia consulta con un subquery
//! UNION + GROUP_CONCAT sobre ?requirements.

use std::fmt::Write;

const PREFIXES: &str = "\
PREFIX gad: <http://example.org/gadgetic#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
";

/// Alcance del catálogo a consultar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogScope {
    /// Todos los individuos gad:Gadget.
    Full,
    /// Solo los gadgets tipados gad:RecommendedFor_KreatorKonten.
    CreatorRecommended,
}

pub struct CatalogQuery {
    scope: CatalogScope,
}

impl CatalogQuery {
    pub fn new(scope: CatalogScope) -> Self {
        Self { scope }
    }

    /// Ensambla el texto SPARQL completo. El orden entre filas viene del
    /// ORDER BY final; el gateway no reordena nada.
    pub fn build(&self) -> String {
        let scope_pattern = match self.scope {
            CatalogScope::Full => "",
            CatalogScope::CreatorRecommended => {
                "    ?id a gad:RecommendedFor_KreatorKonten .\n"
            }
        };

        let mut query = String::new();
        query.push_str(PREFIXES);
        query.push_str(
            "
SELECT DISTINCT ?id ?name ?category ?categoryLabel ?brand ?brandName ?os
       ?ram ?ramTech ?storage ?storageTech ?price ?flightTime ?battery ?batteryWh
       ?batteryLifeHours ?cameraMP ?sensorFormat ?ibis ?video4k ?noiseCancellation
       ?displayPanel ?refreshRateHz ?keyFeature ?availableColor ?releaseYear
       ?weightGr ?bodyMaterial ?vram ?supportsCUDA ?supportsNPU ?requirements
WHERE {
    ?id a gad:Gadget .
",
        );
        query.push_str(scope_pattern);
        query.push_str(
            r#"    OPTIONAL { ?id rdfs:label ?name . }
    OPTIONAL { ?id gad:hasCategory ?category . OPTIONAL { ?category rdfs:label ?categoryLabel . } }
    OPTIONAL { ?id gad:hasBrand ?brand . OPTIONAL { ?brand rdfs:label ?brandName . } }
    OPTIONAL { ?id gad:osName ?os . }
    OPTIONAL {
        ?id gad:hasComponent ?ramComp .
        ?ramComp a gad:RAM ; gad:ramSize ?ram .
        OPTIONAL { ?ramComp gad:ramTech ?ramTech . }
    }
    OPTIONAL {
        ?id gad:hasComponent ?storageComp .
        ?storageComp a gad:Storage ; gad:storageSizeGB ?storage .
        OPTIONAL { ?storageComp gad:storageTech ?storageTech . }
    }
    OPTIONAL {
        ?id gad:hasComponent ?gpu .
        ?gpu a gad:GPU ; gad:vramSize ?vram .
        OPTIONAL { ?gpu gad:supportsCUDA ?supportsCUDA . }
    }
    OPTIONAL { ?id gad:supportsNPU ?supportsNPU . }
    OPTIONAL { ?id gad:priceIDR ?price . }
    OPTIONAL { ?id gad:flightTime ?flightTime . }
    OPTIONAL { ?id gad:batteryCapacitymAh ?battery . }
    OPTIONAL { ?id gad:batteryCapacityWh ?batteryWh . }
    OPTIONAL { ?id gad:batteryLifeHours ?batteryLifeHours . }
    OPTIONAL { ?id gad:cameraMegapixel ?cameraMP . }
    OPTIONAL { ?id gad:sensorFormat ?sensorFormat . }
    OPTIONAL { ?id gad:ibis ?ibis . }
    OPTIONAL { ?id gad:video4k ?video4k . }
    OPTIONAL { ?id gad:noiseCancellation ?noiseCancellation . }
    OPTIONAL { ?id gad:displayPanel ?displayPanel . }
    OPTIONAL { ?id gad:refreshRateHz ?refreshRateHz . }
    OPTIONAL { ?id gad:keyFeature ?keyFeature . }
    OPTIONAL { ?id gad:availableColor ?availableColor . }
    OPTIONAL { ?id gad:releaseYear ?releaseYear . }
    OPTIONAL { ?id gad:weightGr ?weightGr . }
    OPTIONAL { ?id gad:bodyMaterial ?bodyMaterial . }
    OPTIONAL {
        SELECT ?id (GROUP_CONCAT(DISTINCT ?req; SEPARATOR=", ") AS ?requirements)
        WHERE {
            {
                ?id gad:hasComponent ?gAi .
                ?gAi a gad:GPU ; gad:supportsCUDA true ; gad:vramSize ?vAi .
                FILTER(?vAi >= 8)
                BIND("Training_Model_AI" AS ?req)
            }
            UNION {
                ?id gad:hasComponent ?gCuda .
                ?gCuda a gad:GPU ; gad:supportsCUDA true .
                BIND("Advanced_AI_Training" AS ?req)
            }
            UNION {
                ?id gad:hasComponent ?rEdit .
                ?rEdit a gad:RAM ; gad:ramSize ?ramEdit .
                ?id gad:hasComponent ?sEdit .
                ?sEdit a gad:Storage ; gad:storageSizeGB ?storEdit .
                FILTER(?ramEdit >= 16 && ?storEdit >= 512)
                BIND("Video_Editing" AS ?req)
            }
            UNION {
                ?id gad:hasComponent ?gGame .
                ?gGame a gad:GPU ; gad:vramSize ?vGame .
                FILTER(?vGame >= 6)
                BIND("Gaming_1440p" AS ?req)
            }
            UNION {
                ?id gad:batteryCapacityWh ?wh .
                FILTER(?wh >= 50)
                BIND("Mobile_Build" AS ?req)
            }
            UNION {
                ?id gad:batteryCapacitymAh ?mah .
                FILTER(?mah >= 5000)
                FILTER NOT EXISTS { ?id gad:batteryCapacityWh ?anyWh . }
                BIND("Mobile_Build" AS ?req)
            }
            UNION {
                ?id gad:cameraMegapixel ?mp .
                FILTER(?mp >= 48)
                BIND("Mobile_Photo_Video" AS ?req)
            }
            UNION {
                ?id gad:video4k true .
                BIND("Mobile_Photo_Video" AS ?req)
            }
            UNION {
                ?id gad:priceIDR ?p .
                FILTER(?p >= 15000000)
                BIND("Premium_Device_Status" AS ?req)
            }
            UNION {
                ?id gad:hasCategory ?cDrone .
                ?cDrone rdfs:label ?clDrone .
                FILTER(CONTAINS(LCASE(?clDrone), "drone"))
                BIND("Aerial_Videography" AS ?req)
            }
            UNION {
                ?id gad:hasCategory ?cWrist .
                ?cWrist rdfs:label ?clWrist .
                FILTER(CONTAINS(LCASE(?clWrist), "watch") || CONTAINS(LCASE(?clWrist), "band"))
                BIND("Wrist_Health_Tracking" AS ?req)
            }
        }
        GROUP BY ?id
    }
}
ORDER BY ?name
"#,
        );

        query
    }
}

/// Consulta ASK de conveniencia: ¿declara la ontología algún gadget?
pub fn has_gadgets_query() -> String {
    let mut query = String::new();
    query.push_str(PREFIXES);
    let _ = write!(query, "\nASK {{ ?g a gad:Gadget . }}\n");
    query
}
