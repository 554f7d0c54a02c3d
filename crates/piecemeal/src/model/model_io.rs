//! # Model File IO

use std::{fs, path::Path};

use prost::Message;

use crate::{
    errors::{PMError, PMResult},
    model::{DEFAULT_UNK_SURFACE, ModelType, NormalizerSpec, PieceType, TrainerSpec},
    types::PMHashSet,
};

use super::ModelProto;

/// Load and validate a [`ModelProto`] from a file.
///
/// ## Arguments
/// * `path` - the path to a `SentencePiece` model file.
///
/// ## Returns
/// The decoded model, and the raw file bytes.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(path)))]
pub fn load_model_path<P: AsRef<Path>>(path: P) -> PMResult<(ModelProto, Vec<u8>)> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let model = ModelProto::from_bytes(&bytes)?;
    log::debug!(
        "loaded model {}: {} pieces, {:?}",
        path.display(),
        model.pieces.len(),
        model.model_type()
    );
    Ok((model, bytes))
}

impl ModelProto {
    /// Decode and validate a model from protobuf bytes.
    pub fn from_bytes(bytes: &[u8]) -> PMResult<Self> {
        let model = Self::decode(bytes)?;
        model.validate()?;
        Ok(model)
    }

    /// Load and validate a model from a file.
    pub fn load_path<P: AsRef<Path>>(path: P) -> PMResult<Self> {
        Ok(load_model_path(path)?.0)
    }

    /// Encode the model to protobuf bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Write the encoded model to a file.
    pub fn save_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> PMResult<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// Check the structural invariants the encoders rely on.
    ///
    /// * the vocabulary is non-empty;
    /// * every piece is non-empty and unique;
    /// * there is exactly one [`PieceType::Unknown`] piece.
    pub fn validate(&self) -> PMResult<()> {
        if self.pieces.is_empty() {
            return Err(PMError::InvalidModel("empty vocabulary".to_string()));
        }

        let mut seen: PMHashSet<&str> = PMHashSet::default();
        let mut unknowns = 0;
        for (id, sp) in self.pieces.iter().enumerate() {
            let piece = sp.piece();
            if piece.is_empty() {
                return Err(PMError::InvalidModel(format!("empty piece at id {id}")));
            }
            if !seen.insert(piece) {
                return Err(PMError::InvalidModel(format!(
                    "duplicate piece {piece:?} at id {id}"
                )));
            }
            if sp.r#type() == PieceType::Unknown {
                unknowns += 1;
            }
        }

        match unknowns {
            1 => Ok(()),
            0 => Err(PMError::InvalidModel("no unknown piece".to_string())),
            n => Err(PMError::InvalidModel(format!("{n} unknown pieces"))),
        }
    }

    /// The trainer spec, or the proto defaults.
    pub fn trainer(&self) -> TrainerSpec {
        self.trainer_spec.clone().unwrap_or_default()
    }

    /// The normalizer spec, or the proto defaults.
    pub fn normalizer(&self) -> NormalizerSpec {
        self.normalizer_spec.clone().unwrap_or_default()
    }

    /// The segmentation algorithm.
    pub fn model_type(&self) -> ModelType {
        self.trainer_spec
            .as_ref()
            .map(|t| t.model_type())
            .unwrap_or(ModelType::Unigram)
    }

    /// The text rendered in place of unknown pieces when decoding.
    pub fn unk_surface(&self) -> &str {
        self.trainer_spec
            .as_ref()
            .and_then(|t| t.unk_surface.as_deref())
            .unwrap_or(DEFAULT_UNK_SURFACE)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::model::{SentencePiece, testing::sample_model};

    #[test]
    fn test_save_and_load() {
        let model = sample_model();
        let dir = TempDir::new("piecemeal_model").unwrap();
        let path = dir.path().join("spiece.model");

        model.save_path(&path).unwrap();
        let (loaded, bytes) = load_model_path(&path).unwrap();

        assert_eq!(loaded, model);
        assert_eq!(bytes, model.to_bytes());
        assert_eq!(loaded.model_type(), ModelType::Unigram);
        assert_eq!(loaded.unk_surface(), DEFAULT_UNK_SURFACE);
        assert_eq!(ModelProto::load_path(&path).unwrap(), model);
    }

    #[test]
    fn test_garbage_bytes() {
        assert!(matches!(
            ModelProto::from_bytes(&[0xff, 0xff, 0xff]),
            Err(PMError::ModelDecode(_))
        ));
    }

    #[test]
    fn test_validate() {
        let mut model = ModelProto::default();
        assert!(model.validate().is_err());

        model.pieces.push(SentencePiece::new("a", -1.0, PieceType::Normal));
        assert!(matches!(model.validate(), Err(PMError::InvalidModel(_))));

        model
            .pieces
            .push(SentencePiece::new("<unk>", 0.0, PieceType::Unknown));
        model.validate().unwrap();

        model.pieces.push(SentencePiece::new("a", -2.0, PieceType::Normal));
        assert!(model.validate().is_err());
    }
}
