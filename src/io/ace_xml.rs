//! ACE XML 1.1 writers for feature vector files and feature key files.
//!
//! Both documents carry an inline DTD so downstream classifiers can validate
//! them without a schema lookup. Text content is XML-escaped; numeric values
//! use the shortest representation that parses back to the same `f64`.

use std::io::Write;

use quick_xml::escape::escape;

use crate::core::errors::{LyricalError, Result};
use crate::core::featureset::{FeatureDefinition, FeatureVector};

const FEATURE_VECTOR_PREAMBLE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE feature_vector_file [
   <!ELEMENT feature_vector_file (comments, data_set+)>
   <!ELEMENT comments (#PCDATA)>
   <!ELEMENT data_set (data_set_id, section*, feature*)>
   <!ELEMENT data_set_id (#PCDATA)>
   <!ELEMENT section (feature+)>
   <!ATTLIST section start CDATA ""
                     stop CDATA "">
   <!ELEMENT feature (name, v+)>
   <!ELEMENT name (#PCDATA)>
   <!ELEMENT v (#PCDATA)>
]>

"#;

const FEATURE_KEY_PREAMBLE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE feature_key_file [
   <!ELEMENT feature_key_file (comments, feature+)>
   <!ELEMENT comments (#PCDATA)>
   <!ELEMENT feature (name, description?, is_sequential, parallel_dimensions)>
   <!ELEMENT name (#PCDATA)>
   <!ELEMENT description (#PCDATA)>
   <!ELEMENT is_sequential (#PCDATA)>
   <!ELEMENT parallel_dimensions (#PCDATA)>
]>

"#;

/// Render a feature value for the XML output.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

/// Streaming writer for a `feature_vector_file`.
pub struct FeatureVectorWriter<W: Write> {
    out: W,
    records: usize,
}

impl<W: Write> FeatureVectorWriter<W> {
    /// Write the preamble and comments; records follow via [`Self::write_record`].
    pub fn begin(mut out: W, comments: &str) -> Result<Self> {
        write!(
            out,
            "{}<feature_vector_file>\n\n   <comments>{}</comments>\n\n",
            FEATURE_VECTOR_PREAMBLE,
            escape(comments)
        )
        .map_err(write_error)?;

        Ok(Self { out, records: 0 })
    }

    /// Write one `data_set` block.
    pub fn write_record(&mut self, record: &FeatureVector) -> Result<()> {
        let mut block = String::new();
        block.push_str("   <data_set>\n");
        block.push_str(&format!(
            "      <data_set_id>{}</data_set_id>\n",
            escape(&record.data_set_id)
        ));

        for (name, values) in &record.features {
            block.push_str("      <feature>\n");
            block.push_str(&format!("         <name>{}</name>\n", escape(name)));
            for value in values {
                block.push_str(&format!("         <v>{}</v>\n", format_value(*value)));
            }
            block.push_str("      </feature>\n");
        }
        block.push_str("   </data_set>\n\n");

        self.out.write_all(block.as_bytes()).map_err(write_error)?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Close the root element and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.out
            .write_all(b"</feature_vector_file>\n")
            .and_then(|()| self.out.flush())
            .map_err(write_error)?;
        Ok(self.out)
    }
}

/// Write a complete `feature_key_file` describing the given features.
pub fn write_feature_definitions<W: Write>(
    mut out: W,
    definitions: &[FeatureDefinition],
    comments: &str,
) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for definition in definitions {
        if !seen.insert(definition.name.as_str()) {
            return Err(LyricalError::validation(format!(
                "Duplicate feature name '{}' in definitions",
                definition.name
            )));
        }
    }

    let mut doc = String::from(FEATURE_KEY_PREAMBLE);
    doc.push_str("<feature_key_file>\n\n");
    doc.push_str(&format!("   <comments>{}</comments>\n\n", escape(comments)));

    for definition in definitions {
        doc.push_str("   <feature>\n");
        doc.push_str(&format!("      <name>{}</name>\n", escape(&definition.name)));
        if !definition.description.is_empty() {
            doc.push_str(&format!(
                "      <description>{}</description>\n",
                escape(&definition.description)
            ));
        }
        doc.push_str(&format!(
            "      <is_sequential>{}</is_sequential>\n",
            definition.is_sequential
        ));
        doc.push_str(&format!(
            "      <parallel_dimensions>{}</parallel_dimensions>\n",
            definition.dimensions.unwrap_or(0)
        ));
        doc.push_str("   </feature>\n\n");
    }
    doc.push_str("</feature_key_file>\n");

    out.write_all(doc.as_bytes())
        .and_then(|()| out.flush())
        .map_err(write_error)
}

fn write_error(err: std::io::Error) -> LyricalError {
    LyricalError::io("Failed to write ACE XML output", err)
}
