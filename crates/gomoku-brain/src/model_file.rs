use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Brain, BrainError, layer::Layer};

const FORMAT_TAG: &str = "gomoku-brain";
const FORMAT_VERSION: u32 = 1;

/// On-disk representation of a [`Brain`].
#[derive(Debug, Serialize, Deserialize)]
struct ModelDocument {
    format: String,
    version: u32,
    rows: usize,
    cols: usize,
    layers: Vec<Layer>,
}

impl ModelDocument {
    fn validate(&self) -> Result<(), BrainError> {
        if self.format != FORMAT_TAG {
            return Err(BrainError::Format {
                found: self.format.clone(),
            });
        }
        if self.version != FORMAT_VERSION {
            return Err(BrainError::Version {
                found: self.version,
                expected: FORMAT_VERSION,
            });
        }
        self.check_shape().map_err(|reason| BrainError::Shape { reason })
    }

    fn check_shape(&self) -> Result<(), String> {
        let Some(cells) = self.rows.checked_mul(self.cols) else {
            return Err(format!("board {}x{} is too large", self.rows, self.cols));
        };
        if cells == 0 {
            return Err(format!("board is {}x{}", self.rows, self.cols));
        }
        let (Some(first), Some(last)) = (self.layers.first(), self.layers.last()) else {
            return Err("model has no layers".to_owned());
        };
        if first.inputs != cells {
            return Err(format!(
                "first layer takes {} inputs, board has {cells} cells",
                first.inputs
            ));
        }
        if last.outputs != cells {
            return Err(format!(
                "last layer has {} outputs, board has {cells} cells",
                last.outputs
            ));
        }
        for (index, pair) in self.layers.windows(2).enumerate() {
            if pair[0].outputs != pair[1].inputs {
                return Err(format!(
                    "layer {index} has {} outputs but layer {} takes {} inputs",
                    pair[0].outputs,
                    index + 1,
                    pair[1].inputs
                ));
            }
        }
        for (index, layer) in self.layers.iter().enumerate() {
            layer.check_shape(index)?;
        }
        Ok(())
    }
}

impl Brain {
    /// Writes every parameter to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save<P>(&self, path: P) -> Result<(), BrainError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BrainError::Create {
            path: path.to_owned(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|source| BrainError::Create {
            path: path.to_owned(),
            source,
        })?;
        log::debug!(
            "saved {} parameters to {}",
            self.parameter_count(),
            path.display()
        );
        Ok(())
    }

    /// Restores a network previously written by [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or describes an
    /// inconsistent network.
    pub fn load<P>(path: P) -> Result<Self, BrainError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BrainError::Open {
            path: path.to_owned(),
            source,
        })?;
        let brain = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded {}x{} model with {} layers from {}",
            brain.rows,
            brain.cols,
            brain.layers.len(),
            path.display()
        );
        Ok(brain)
    }

    /// # Errors
    ///
    /// Returns an error if serialization or the underlying writer fails.
    pub fn to_writer<W>(&self, writer: W) -> Result<(), BrainError>
    where
        W: io::Write,
    {
        let document = ModelDocument {
            format: FORMAT_TAG.to_owned(),
            version: FORMAT_VERSION,
            rows: self.rows,
            cols: self.cols,
            layers: self.layers.clone(),
        };
        serde_json::to_writer(writer, &document).map_err(|source| BrainError::Encode { source })
    }

    /// # Errors
    ///
    /// Returns an error if the data is not a valid, self-consistent model document.
    pub fn from_reader<R>(reader: R) -> Result<Self, BrainError>
    where
        R: io::Read,
    {
        let document: ModelDocument =
            serde_json::from_reader(reader).map_err(|source| BrainError::Decode { source })?;
        document.validate()?;
        Ok(Self {
            rows: document.rows,
            cols: document.cols,
            layers: document.layers,
        })
    }
}
