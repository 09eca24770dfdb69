//! Interactive boundary: input validation, panels, and the client that
//! routes user actions into the history.

use crate::classifier::{classify, Category, Tone};
use crate::configuration::DisplaySettings;
use crate::gateway::{fetch_history_or_empty, GatewayError, MeasurementGateway};
use crate::history::HistoryReconciler;
use crate::models::{Measurement, MeasurementDetail};
use crate::normalizer::normalize;
use crate::render::{RenderSink, CATEGORY_PLACEHOLDER, TEMPERATURE_PLACEHOLDER};
use log::{error, info};
use std::collections::VecDeque;
use thiserror::Error;

pub const CITIES: [&str; 15] = [
    "Buenos Aires",
    "Córdoba",
    "Rosario",
    "Mendoza",
    "La Plata",
    "Mar del Plata",
    "Bahía Blanca",
    "Tucumán",
    "Neuquén",
    "Bariloche",
    "Ushuaia",
    "Salta",
    "Santa Fe",
    "Corrientes",
    "Posadas",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Por favor, ingresá un valor numérico.")]
    NotANumber,
    #[error("Ingresá una ciudad antes de buscar.")]
    EmptyCity,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Error consultando la API. Revisá la consola.")]
    Lookup(#[source] GatewayError),
    #[error("No se pudo obtener datos de la ciudad.")]
    NoData,
}

/// Reads a temperature the way a lenient numeric field does: leading
/// whitespace is skipped and the longest numeric prefix wins, so `"12abc"`
/// reads as 12.
pub fn parse_temperature(input: &str) -> Result<f64, InputError> {
    let input = input.trim_start();
    input
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| input[..end].parse::<f64>().ok())
        .filter(|t| t.is_finite())
        .ok_or(InputError::NotANumber)
}

pub fn parse_city(input: &str) -> Result<String, InputError> {
    let city = input.trim();
    if city.is_empty() {
        return Err(InputError::EmptyCity);
    }
    Ok(city.to_owned())
}

/// Known cities starting with `prefix`, ignoring case.
pub fn autocomplete(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    CITIES
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().starts_with(&prefix))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Classify(String),
    Search(String),
    Suggest(String),
    History,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim().to_owned();
        match verb.to_lowercase().as_str() {
            "clasificar" => Command::Classify(rest),
            "buscar" => Command::Search(rest),
            "sugerir" => Command::Suggest(rest),
            "historial" => Command::History,
            "salir" => Command::Quit,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

/// Result of the last manual classification.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorPanel {
    pub temperature: f64,
    pub category: Category,
    pub tone: Tone,
    pub gauge_percent: f64,
}

/// Result of the last successful city lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct CityPanel {
    pub temperature: String,
    pub category: Option<Category>,
    pub detail: MeasurementDetail,
}

pub struct Client<G, S: RenderSink> {
    gateway: G,
    history: HistoryReconciler<S>,
    monitor: Option<MonitorPanel>,
    city_panel: Option<CityPanel>,
    searched: VecDeque<String>,
}

impl<G: MeasurementGateway, S: RenderSink> Client<G, S> {
    pub fn new(gateway: G, sink: S, display: DisplaySettings) -> Self {
        Self {
            gateway,
            history: HistoryReconciler::new(sink, display),
            monitor: None,
            city_panel: None,
            searched: VecDeque::new(),
        }
    }

    /// Loads the stored history. Must complete before user actions are
    /// accepted so the initial rows keep their chronological order.
    pub async fn start(&mut self) -> usize {
        let payload = fetch_history_or_empty(&self.gateway).await;
        self.history.load_bulk(&payload)
    }

    pub fn classify_manual(&mut self, input: &str) -> Result<&MonitorPanel, ClientError> {
        let temperature = parse_temperature(input)?;
        let category = classify(temperature);
        self.history.record_manual(temperature);
        Ok(&*self.monitor.insert(MonitorPanel {
            temperature,
            category,
            tone: category.tone(),
            gauge_percent: normalize(temperature),
        }))
    }

    /// On failure the panels and the history are left as they were.
    pub async fn search_city(&mut self, input: &str) -> Result<Measurement, ClientError> {
        let city = parse_city(input)?;
        let raw = self.gateway.submit_city_query(&city).await.map_err(|e| {
            error!("Error querying city {}: {}", city, e);
            ClientError::Lookup(e)
        })?;
        if raw.is_null() {
            return Err(ClientError::NoData);
        }

        let measurement = self.history.record_city_lookup(&raw, &city).clone();
        let timestamp = self.history.format_timestamp(&measurement);
        let temperature = measurement
            .temperature
            .map(|t| format!("{:.1}", t))
            .unwrap_or_else(|| TEMPERATURE_PLACEHOLDER.to_owned());
        self.searched.push_front(format!(
            "{} – {} °C ({})",
            measurement.city_label,
            measurement
                .temperature
                .map(|t| t.to_string())
                .unwrap_or_else(|| TEMPERATURE_PLACEHOLDER.to_owned()),
            measurement
                .category
                .map(|c| c.label())
                .unwrap_or(CATEGORY_PLACEHOLDER),
        ));
        self.city_panel = Some(CityPanel {
            temperature,
            category: measurement.category,
            detail: MeasurementDetail::from_lookup(&raw, &measurement, &timestamp),
        });
        info!("Recorded lookup for {}", measurement.city_label);
        Ok(measurement)
    }

    pub fn history(&self) -> &HistoryReconciler<S> {
        &self.history
    }

    pub fn monitor(&self) -> Option<&MonitorPanel> {
        self.monitor.as_ref()
    }

    pub fn city_panel(&self) -> Option<&CityPanel> {
        self.city_panel.as_ref()
    }

    /// Searched cities, newest first.
    pub fn searched_cities(&self) -> impl Iterator<Item = &str> {
        self.searched.iter().map(String::as_str)
    }
}
