use log::debug;
use polystage_engine::{Engine, EngineError, EngineType};

/// Back-ends compiled into this build.
pub fn available() -> Vec<EngineType> {
    EngineType::ALL.into_iter().filter(|t| engine_for(*t).is_ok()).collect()
}

/// Constructs an unmounted adapter for `kind`.
///
/// A back-end whose cargo feature is disabled is reported like an unknown
/// identifier.
pub fn engine_for(kind: EngineType) -> Result<Box<dyn Engine>, EngineError> {
    match kind {
        #[cfg(feature = "canvas2d")]
        EngineType::Canvas2d => Ok(Box::new(polystage_canvas::Canvas2dEngine::new())),
        #[cfg(feature = "scene3d")]
        EngineType::Scene3d => Ok(Box::new(polystage_scene3d::Scene3dEngine::new())),
        #[cfg(feature = "xr")]
        EngineType::Xr => Ok(Box::new(polystage_xr::XrEngine::new())),
        #[allow(unreachable_patterns)]
        other => Err(EngineError::UnknownEngineType(other.to_string())),
    }
}

/// Resolves a back-end identifier (`"2d"`, `"3d"`, `"xr"` or an alias) to
/// a fresh adapter. The caller still has to `initialize` it.
pub async fn create_engine(identifier: &str) -> Result<Box<dyn Engine>, EngineError> {
    let kind: EngineType = identifier.parse()?;
    let engine = engine_for(kind)?;
    debug!("selected {kind} engine for `{identifier}`");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_select_matching_back_end() {
        for (id, kind) in [("2d", EngineType::Canvas2d), ("3d", EngineType::Scene3d), ("xr", EngineType::Xr)] {
            let engine = pollster::block_on(create_engine(id)).unwrap();
            assert_eq!(engine.engine_type(), kind);
        }
    }

    #[test]
    fn unknown_identifier_fails() {
        let err = pollster::block_on(create_engine("webgpu")).err().unwrap();
        assert_eq!(err.to_string(), "unknown engine type: webgpu");
    }

    #[test]
    fn every_back_end_is_available_by_default() {
        assert_eq!(available(), EngineType::ALL.to_vec());
    }
}
