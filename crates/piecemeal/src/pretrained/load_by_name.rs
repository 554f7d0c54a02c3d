//! # Pretrained Tokenizers by Name

use std::path::Path;

use crate::{
    errors::{PMError, PMResult},
    pretrained::{ConstUrlResource, KeyedResource, ResourceLoader},
    tokenizer::{ReformerTokenizer, TokenizerOptions},
};

/// A named pretrained tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PretrainedTokenizer {
    /// Names this tokenizer answers to; the first is canonical.
    pub aliases: &'static [&'static str],

    /// The `spiece.model` resource.
    pub model: KeyedResource,

    /// The longest sequence the model accepts.
    pub model_max_length: Option<usize>,
}

/// `google/reformer-crime-and-punishment`.
pub const REFORMER_CRIME_AND_PUNISHMENT: PretrainedTokenizer = PretrainedTokenizer {
    aliases: &[
        "google/reformer-crime-and-punishment",
        "reformer-crime-and-punishment",
    ],
    model: KeyedResource {
        context: &["google", "reformer-crime-and-punishment"],
        file: "spiece.model",
        resource: ConstUrlResource::new(&[
            "https://huggingface.co/google/reformer-crime-and-punishment/resolve/main/spiece.model",
            "https://cdn.huggingface.co/google/reformer-crime-and-punishment/spiece.model",
        ]),
    },
    model_max_length: Some(524288),
};

const PRETRAINED_TOKENIZERS: &[PretrainedTokenizer] = &[REFORMER_CRIME_AND_PUNISHMENT];

impl PretrainedTokenizer {
    /// The canonical name.
    pub fn name(&self) -> &'static str {
        self.aliases[0]
    }

    /// The tokenizer options this model ships with.
    pub fn options(&self) -> TokenizerOptions {
        TokenizerOptions::default().with_model_max_length(self.model_max_length)
    }

    /// Resolve the model through `loader` and build the tokenizer.
    pub fn load(
        &self,
        loader: &mut dyn ResourceLoader,
    ) -> PMResult<ReformerTokenizer> {
        let path = loader.load_resource_path(&self.model)?;
        Ok(ReformerTokenizer::from_model_file(path)?.with_options(self.options()))
    }
}

/// Find a pretrained tokenizer by any of its aliases.
pub fn lookup_model(name: &str) -> Option<&'static PretrainedTokenizer> {
    PRETRAINED_TOKENIZERS
        .iter()
        .find(|t| t.aliases.contains(&name))
}

/// Load a pretrained tokenizer by name.
///
/// ## Errors
/// [`PMError::ResourceNotFound`] for unknown names.
pub fn load_pretrained(
    name: &str,
    loader: &mut dyn ResourceLoader,
) -> PMResult<ReformerTokenizer> {
    lookup_model(name)
        .ok_or_else(|| PMError::ResourceNotFound(format!("no pretrained tokenizer named {name:?}")))?
        .load(loader)
}

/// List the available pretrained tokenizers.
///
/// ## Arguments
/// * `aliases` - include every alias, not just the canonical names.
pub fn list_models(aliases: bool) -> Vec<String> {
    let mut models = Vec::new();
    for tokenizer in PRETRAINED_TOKENIZERS {
        if aliases {
            models.extend(tokenizer.aliases.iter().map(|a| a.to_string()));
        } else {
            models.push(tokenizer.name().to_string());
        }
    }
    models
}

impl ReformerTokenizer {
    /// Load from a saved directory, or else a pretrained name.
    ///
    /// ## Arguments
    /// * `name_or_path` - a directory written by `save_pretrained`, or a
    ///   name from [`list_models`].
    /// * `loader` - resolves pretrained resources.
    pub fn from_pretrained(
        name_or_path: &str,
        loader: &mut dyn ResourceLoader,
    ) -> PMResult<Self> {
        if Path::new(name_or_path).is_dir() {
            return Self::from_pretrained_dir(name_or_path);
        }
        load_pretrained(name_or_path, loader)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::{
        encoders::PieceProcessor,
        model::testing::sample_model,
        pretrained::LocalResourceDir,
    };

    #[test]
    fn test_list_models() {
        assert_eq!(list_models(false), vec!["google/reformer-crime-and-punishment"]);
        assert_eq!(
            list_models(true),
            vec![
                "google/reformer-crime-and-punishment",
                "reformer-crime-and-punishment",
            ]
        );
        assert_eq!(
            lookup_model("reformer-crime-and-punishment").map(|t| t.name()),
            Some("google/reformer-crime-and-punishment")
        );
        assert!(lookup_model("nope").is_none());
    }

    #[test]
    fn test_load_through_loader() {
        let tmp = TempDir::new("piecemeal-pretrained").unwrap();
        let mut loader = LocalResourceDir::new(tmp.path());

        assert!(matches!(
            load_pretrained("nope", &mut loader),
            Err(PMError::ResourceNotFound(_))
        ));
        assert!(matches!(
            load_pretrained("google/reformer-crime-and-punishment", &mut loader),
            Err(PMError::ResourceNotFound(_))
        ));

        // Stage a stand-in model where the loader expects it.
        let path = REFORMER_CRIME_AND_PUNISHMENT.model.path_under(tmp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, sample_model().to_bytes()).unwrap();

        let tok =
            ReformerTokenizer::from_pretrained("google/reformer-crime-and-punishment", &mut loader)
                .unwrap();
        assert_eq!(tok.options().model_max_length, Some(524288));
        assert_eq!(tok.encode_ids("This is a test"), vec![285, 46, 10, 170, 382]);
    }

    #[test]
    fn test_from_pretrained_dir_path() {
        let tmp = TempDir::new("piecemeal-pretrained-dir").unwrap();
        let tok = ReformerTokenizer::new(PieceProcessor::from_model(sample_model()).unwrap());
        tok.save_pretrained(tmp.path()).unwrap();

        let mut loader = LocalResourceDir::new(tmp.path());
        let path = tmp.path().to_str().unwrap();
        let reloaded = ReformerTokenizer::from_pretrained(path, &mut loader).unwrap();
        assert_eq!(reloaded.len(), tok.len());
    }
}
