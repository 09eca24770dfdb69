//! The ordered history of measurements and the insertion policy per source.

use crate::configuration::DisplaySettings;
use crate::models::{Measurement, Placement, Source};
use crate::render::{RenderSink, RenderedRow};
use crate::resolver::CITY_SENTINEL;
use log::{debug, info};
use serde_json::Value;

pub struct HistoryReconciler<S: RenderSink> {
    measurements: Vec<Measurement>,
    sink: S,
    display: DisplaySettings,
}

impl<S: RenderSink> HistoryReconciler<S> {
    pub fn new(sink: S, display: DisplaySettings) -> Self {
        Self {
            measurements: Vec::new(),
            sink,
            display,
        }
    }

    /// Current history, in display order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Appends every record of a history payload in received order and
    /// returns how many were added. Anything but a JSON array is ignored.
    pub fn load_bulk(&mut self, payload: &Value) -> usize {
        let records = match payload.as_array() {
            Some(records) => records,
            None => {
                debug!("Ignoring non-array history payload");
                return 0;
            }
        };
        for raw in records {
            self.insert(Measurement::from_raw(raw, Source::BulkLoad, Some(CITY_SENTINEL)));
        }
        info!("Loaded {} measurements from history", records.len());
        records.len()
    }

    /// `temperature` must already be validated as finite.
    pub fn record_manual(&mut self, temperature: f64) -> &Measurement {
        self.insert(Measurement::manual(temperature))
    }

    /// Inserts a city lookup ahead of everything rendered so far, naming it
    /// after `queried_city` when the record carries no city.
    pub fn record_city_lookup(&mut self, raw: &Value, queried_city: &str) -> &Measurement {
        self.insert(Measurement::from_raw(raw, Source::CityLookup, Some(queried_city)))
    }

    pub fn reset(&mut self) {
        self.measurements.clear();
        self.sink.clear();
    }

    pub fn format_timestamp(&self, measurement: &Measurement) -> String {
        measurement
            .timestamp
            .format(&self.display.timestamp_format)
            .to_string()
    }

    fn insert(&mut self, measurement: Measurement) -> &Measurement {
        let row = RenderedRow::project(&measurement, &self.display.timestamp_format);
        debug!(
            "Inserting {:?} measurement {} ({})",
            measurement.source, measurement.id, row.category
        );
        match measurement.source.placement() {
            Placement::Front => {
                self.sink.prepend(&row);
                self.measurements.insert(0, measurement);
                &self.measurements[0]
            }
            Placement::Back => {
                self.sink.append(&row);
                self.measurements.push(measurement);
                &self.measurements[self.measurements.len() - 1]
            }
        }
    }
}
