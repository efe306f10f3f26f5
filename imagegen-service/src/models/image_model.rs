//! The fixed set of hosted text-to-image models this service can call.

use std::fmt;
use std::str::FromStr;

/// Seed passed to the models that accept one, so repeated prompts reproduce.
pub const DEFAULT_SEED: u32 = 100;

/// How a model's inference result has to be turned into image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDecoding {
    /// The result body is the image itself and is passed through untouched.
    RawStream,

    /// The result is a JSON object holding the image as base64 text.
    Base64Field,
}

/// Supported text-to-image models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageModel {
    /// SDXL-Lightning. Generates 1024px images in a few steps.
    #[default]
    Speed,

    /// Dreamshaper 8 LCM, a Stable Diffusion fine-tune for photorealism.
    Photorealism,

    /// FLUX.1 [schnell], a 12B rectified flow transformer suited to concept art.
    ConceptArt,
}

impl ImageModel {
    pub const ALL: [ImageModel; 3] = [
        ImageModel::Speed,
        ImageModel::Photorealism,
        ImageModel::ConceptArt,
    ];

    /// Identifier of the hosted model.
    pub fn id(&self) -> &'static str {
        match self {
            ImageModel::Speed => "@cf/bytedance/stable-diffusion-xl-lightning",
            ImageModel::Photorealism => "@cf/lykon/dreamshaper-8-lcm",
            ImageModel::ConceptArt => "@cf/black-forest-labs/flux-1-schnell",
        }
    }

    /// Short name used for metric labels and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ImageModel::Speed => "speed",
            ImageModel::Photorealism => "photorealism",
            ImageModel::ConceptArt => "concept_art",
        }
    }

    pub fn seed(&self) -> Option<u32> {
        match self {
            ImageModel::Speed | ImageModel::Photorealism => Some(DEFAULT_SEED),
            ImageModel::ConceptArt => None,
        }
    }

    pub fn decoding(&self) -> ResponseDecoding {
        match self {
            ImageModel::Speed | ImageModel::Photorealism => ResponseDecoding::RawStream,
            ImageModel::ConceptArt => ResponseDecoding::Base64Field,
        }
    }

    /// Resolve an optional identifier from a request.
    ///
    /// `None` selects the default model; an unknown identifier yields `Err`.
    pub fn resolve(id: Option<&str>) -> Result<Self, UnknownModel> {
        match id {
            None => Ok(ImageModel::default()),
            Some(id) => id.parse(),
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a model identifier is not one of [`ImageModel::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModel(pub String);

impl fmt::Display for UnknownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model: {}", self.0)
    }
}

impl std::error::Error for UnknownModel {}

impl FromStr for ImageModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageModel::ALL
            .into_iter()
            .find(|model| model.id() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_speed_model() {
        assert_eq!(ImageModel::resolve(None), Ok(ImageModel::Speed));
        assert_eq!(
            ImageModel::default().id(),
            "@cf/bytedance/stable-diffusion-xl-lightning"
        );
    }

    #[test]
    fn parses_every_known_identifier() {
        for model in ImageModel::ALL {
            assert_eq!(model.id().parse::<ImageModel>(), Ok(model));
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        let err = ImageModel::resolve(Some("@cf/stabilityai/stable-diffusion-xl-base-1.0"))
            .unwrap_err();
        assert_eq!(err.0, "@cf/stabilityai/stable-diffusion-xl-base-1.0");
    }

    #[test]
    fn only_stream_models_are_seeded() {
        assert_eq!(ImageModel::Speed.seed(), Some(100));
        assert_eq!(ImageModel::Photorealism.seed(), Some(100));
        assert_eq!(ImageModel::ConceptArt.seed(), None);

        assert_eq!(ImageModel::Speed.decoding(), ResponseDecoding::RawStream);
        assert_eq!(ImageModel::Photorealism.decoding(), ResponseDecoding::RawStream);
        assert_eq!(ImageModel::ConceptArt.decoding(), ResponseDecoding::Base64Field);
    }
}
