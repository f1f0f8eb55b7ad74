//! Gateway de consultas sobre la ontología OWL local.
//!
//! Flujo por petición:
//!   1. Leer el fichero Turtle completo como UTF-8.
//!   2. Parsearlo en un store Oxigraph en memoria (efímero, sin caché).
//!   3. Evaluar la consulta SPARQL contra ese único store.
//!   4. Materializar todas las soluciones como filas variable → valor.
//!
//! El parser y el motor SPARQL son Oxigraph: aquí no se implementa ni álgebra
//! de consultas ni razonamiento, solo el contrato fichero + consulta → filas.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use oxigraph::io::RdfFormat;
use oxigraph::model::Term;
use oxigraph::sparql::{EvaluationError, QueryResults};
use oxigraph::store::{LoaderError, StorageError, Store};
use thiserror::Error;

/// Una fila de resultado: variable ligada → valor en forma de string.
/// Las variables OPTIONAL no ligadas en una solución no aparecen en el mapa.
pub type BindingRow = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("no se pudo leer la ontología en {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("la ontología no es RDF válido: {0}")]
    Parse(#[from] LoaderError),

    #[error("error al evaluar la consulta SPARQL: {0}")]
    Query(#[from] EvaluationError),

    #[error("error del almacén RDF: {0}")]
    Store(#[from] StorageError),
}

/// Handle del motor de consultas. Sin estado mutable: es seguro compartirlo
/// entre peticiones concurrentes detrás de un `Arc`.
pub struct OntologyGateway {
    ontology_path: PathBuf,
}

impl OntologyGateway {
    pub fn new(ontology_path: PathBuf) -> Self {
        Self { ontology_path }
    }

    pub fn ontology_path(&self) -> &Path {
        &self.ontology_path
    }

    /// Ejecuta una consulta SELECT (o ASK) contra la ontología configurada.
    ///
    /// Devuelve la secuencia completa de filas en el orden del motor; el
    /// orden entre filas es responsabilidad del `ORDER BY` de la consulta.
    pub fn run_query(&self, sparql: &str) -> Result<Vec<BindingRow>, OntologyError> {
        let store = self.load_store()?;
        run_query_on(&store, sparql)
    }

    /// Carga la ontología y devuelve el número de sentencias del grafo.
    /// Se usa como comprobación de salud en el arranque y en `/api/ontology-info`.
    pub fn triple_count(&self) -> Result<usize, OntologyError> {
        let store = self.load_store()?;
        Ok(store.len()?)
    }

    fn load_store(&self) -> Result<Store, OntologyError> {
        let content =
            fs::read_to_string(&self.ontology_path).map_err(|source| OntologyError::FileAccess {
                path: self.ontology_path.clone(),
                source,
            })?;

        let store = Store::new()?;
        store.load_from_reader(RdfFormat::Turtle, content.as_bytes())?;
        Ok(store)
    }
}

/// Ejecuta `queryOntology` puro: todas las soluciones, reducidas a strings.
fn run_query_on(store: &Store, sparql: &str) -> Result<Vec<BindingRow>, OntologyError> {
    match store.query(sparql)? {
        QueryResults::Solutions(solutions) => {
            let mut rows = Vec::new();
            for solution in solutions {
                let solution = solution?;
                let mut row = BindingRow::new();
                for (var, term) in solution.iter() {
                    row.insert(var.as_str().to_string(), term_value(term));
                }
                rows.push(row);
            }
            Ok(rows)
        }
        QueryResults::Boolean(value) => {
            let mut row = BindingRow::new();
            row.insert("result".to_string(), value.to_string());
            Ok(vec![row])
        }
        QueryResults::Graph(_) => {
            // CONSTRUCT/DESCRIBE no forman parte del contrato: fila vacía.
            Ok(Vec::new())
        }
    }
}

/// Reduce un término RDF a su valor string: IRIs sin corchetes, literales por
/// su forma léxica. Etiquetas de idioma y datatypes se descartan.
fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::BlankNode(node) => node.as_str().to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE_TTL: &str = r#"
@prefix gad: <http://example.org/gadgetic#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

gad:Phone1 a gad:Gadget ;
    rdfs:label "Ponsel Uno" ;
    gad:priceIDR 4500000 .

gad:Phone2 a gad:Gadget ;
    rdfs:label "Ponsel Dos" ;
    gad:priceIDR 9000000 .
"#;

    fn fixture_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE_TTL.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_select_returns_ordered_rows() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());

        let rows = gateway
            .run_query(
                r#"
                PREFIX gad: <http://example.org/gadgetic#>
                PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
                SELECT ?name ?price WHERE {
                    ?g a gad:Gadget ; rdfs:label ?name ; gad:priceIDR ?price .
                }
                ORDER BY ?name
                "#,
            )
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name").unwrap(), "Ponsel Dos");
        assert_eq!(rows[0].get("price").unwrap(), "9000000");
        assert_eq!(rows[1].get("name").unwrap(), "Ponsel Uno");
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());
        let query = r#"
            PREFIX gad: <http://example.org/gadgetic#>
            PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
            SELECT ?name WHERE { ?g rdfs:label ?name . } ORDER BY ?name
        "#;

        let first = gateway.run_query(query).unwrap();
        let second = gateway.run_query(query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iri_values_have_no_brackets() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());

        let rows = gateway
            .run_query(
                r#"
                PREFIX gad: <http://example.org/gadgetic#>
                SELECT ?g WHERE { ?g a gad:Gadget . } ORDER BY ?g
                "#,
            )
            .unwrap();

        assert_eq!(rows[0].get("g").unwrap(), "http://example.org/gadgetic#Phone1");
    }

    #[test]
    fn test_optional_absent_is_missing_key() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());

        let rows = gateway
            .run_query(
                r#"
                PREFIX gad: <http://example.org/gadgetic#>
                PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
                SELECT ?name ?os WHERE {
                    ?g rdfs:label ?name .
                    OPTIONAL { ?g gad:osName ?os . }
                }
                ORDER BY ?name
                "#,
            )
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].get("name").is_some());
        assert!(rows[0].get("os").is_none());
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let gateway = OntologyGateway::new(PathBuf::from("/no/existe/kelas.owl"));
        let err = gateway.run_query("SELECT * WHERE { ?s ?p ?o }").unwrap_err();
        assert!(matches!(err, OntologyError::FileAccess { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_malformed_turtle_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"esto no es turtle @@@").unwrap();

        let gateway = OntologyGateway::new(file.path().to_path_buf());
        let err = gateway.run_query("SELECT * WHERE { ?s ?p ?o }").unwrap_err();
        assert!(matches!(err, OntologyError::Parse(_)));
    }

    #[test]
    fn test_malformed_sparql_is_query_error() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());

        let err = gateway.run_query("SELECT WHERE {").unwrap_err();
        assert!(matches!(err, OntologyError::Query(_)));
    }

    #[test]
    fn test_ask_query_yields_boolean_row() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());

        let rows = gateway
            .run_query(
                r#"
                PREFIX gad: <http://example.org/gadgetic#>
                ASK { gad:Phone1 a gad:Gadget . }
                "#,
            )
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("result").unwrap(), "true");
    }

    #[test]
    fn test_triple_count() {
        let file = fixture_file();
        let gateway = OntologyGateway::new(file.path().to_path_buf());
        assert_eq!(gateway.triple_count().unwrap(), 6);
    }
}
