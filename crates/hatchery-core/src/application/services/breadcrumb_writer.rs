//! Breadcrumb Writer: the diagnostic JSON record of one run.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{BreadcrumbRecord, ParameterMap, RuntimeEnv},
    error::HatcheryResult,
};

pub struct BreadcrumbWriter<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> BreadcrumbWriter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Write `params` plus a fresh runtime snapshot to `path`.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write(&self, path: &Path, params: &ParameterMap) -> HatcheryResult<BreadcrumbRecord> {
        let record = BreadcrumbRecord::new(params.clone(), RuntimeEnv::capture());
        let json = to_sorted_json(&record)?;
        self.filesystem.write_file(path, &json)?;
        debug!(bytes = json.len(), "breadcrumb written");
        Ok(record)
    }
}

/// Four-space indented JSON; map keys come out sorted because every map in
/// the record is a `BTreeMap` and struct fields are declared alphabetically.
pub fn to_sorted_json<T: Serialize>(value: &T) -> HatcheryResult<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .map_err(|e| ApplicationError::BreadcrumbFailed {
            reason: e.to_string(),
        })?;
    String::from_utf8(buf).map_err(|e| {
        ApplicationError::BreadcrumbFailed {
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockFilesystem;
    use std::sync::{Arc, Mutex};

    #[test]
    fn output_is_sorted_and_indented_by_four() {
        let captured = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&captured);
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().returning(move |_, content| {
            *sink.lock().unwrap() = content.to_string();
            Ok(())
        });

        let params: ParameterMap = [
            ("zeta".to_string(), "1".to_string()),
            ("alpha".to_string(), "2".to_string()),
        ]
        .into();
        let record = BreadcrumbWriter::new(&fs)
            .write(Path::new("/out/kit/hatchery-crumbs.json"), &params)
            .unwrap();

        let json = captured.lock().unwrap().clone();
        assert!(json.starts_with("{\n    \"cookiecutter_params\": {\n        \"alpha\""));
        assert!(json.find("\"alpha\"").unwrap() < json.find("\"zeta\"").unwrap());
        assert!(json.find("\"current_time\"").unwrap() < json.find("\"platform\"").unwrap());

        let parsed: BreadcrumbRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.cookiecutter_params, params);
    }
}
