use fs_err as fs;
use std::path::{Path, PathBuf};

/// Files written for one remote generation.
#[derive(Debug)]
pub struct SavedPaths {
    pub prompt: PathBuf,
    pub response: Option<PathBuf>,
}

/// Save the prompt and, when the call succeeded, the raw response under `dir`.
pub fn save(dir: &Path, attempt: &str, prompt: &str, response: Option<&str>) -> anyhow::Result<SavedPaths> {
    fs::create_dir_all(dir)?;

    let prompt_path = dir.join(format!("{attempt}.prompt.txt"));
    fs::write(&prompt_path, prompt)?;

    let mut response_path = None;
    if let Some(text) = response {
        let p = dir.join(format!("{attempt}.response.txt"));
        fs::write(&p, text)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { prompt: prompt_path, response: response_path })
}

/// Like [`save`], but only logs on failure. Transcripts never affect generation.
pub fn save_best_effort(dir: Option<&Path>, attempt: &str, prompt: &str, response: Option<&str>) {
    let Some(dir) = dir else { return };
    match save(dir, attempt, prompt, response) {
        Ok(saved) => log::debug!("transcript saved at {}", saved.prompt.display()),
        Err(e) => log::warn!("could not write transcript {attempt}: {e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_prompt_and_response_files() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save(&dir.path().join("t"), "a1", "the prompt", Some("the reply")).unwrap();
        assert_eq!(std::fs::read_to_string(&saved.prompt).unwrap(), "the prompt");
        assert_eq!(std::fs::read_to_string(saved.response.unwrap()).unwrap(), "the reply");
    }

    #[test]
    fn failed_call_saves_prompt_only() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save(dir.path(), "a2", "p", None).unwrap();
        assert!(saved.response.is_none());
        assert!(!dir.path().join("a2.response.txt").exists());
    }

    #[test]
    fn best_effort_swallows_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // A regular file where a directory is expected.
        save_best_effort(Some(blocker.join("sub").as_path()), "a3", "p", Some("r"));
        save_best_effort(None, "a4", "p", None);
    }
}
