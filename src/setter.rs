use std::path::Path;
use std::process::Command;

use crate::error::{RedpaperError, Result};

/// Makes a local image the current desktop background. One implementation
/// per platform variant, selected once at startup.
pub trait WallpaperSetter {
    fn apply(&self, path: &Path) -> Result<()>;
}

pub fn for_platform(platform: &str, monitors: u32) -> Box<dyn WallpaperSetter> {
    match platform.to_ascii_lowercase().as_str() {
        "macos" | "darwin" => Box::new(FinderSetter),
        "xfce4" => Box::new(Xfce4Setter { monitors }),
        _ => Box::new(FehSetter),
    }
}

/// Generic Linux setter shelling out to feh.
pub struct FehSetter;

impl FehSetter {
    fn invocation(path: &Path) -> Vec<String> {
        vec![
            "feh".to_string(),
            "--bg-scale".to_string(),
            path.display().to_string(),
        ]
    }
}

impl WallpaperSetter for FehSetter {
    fn apply(&self, path: &Path) -> Result<()> {
        run(&Self::invocation(path))
    }
}

/// XFCE4 setter driving xfconf-query, once per monitor.
pub struct Xfce4Setter {
    pub monitors: u32,
}

impl Xfce4Setter {
    fn invocations(&self, path: &Path) -> Vec<Vec<String>> {
        (0..self.monitors)
            .map(|monitor| {
                vec![
                    "xfconf-query".to_string(),
                    "-c".to_string(),
                    "xfce4-desktop".to_string(),
                    "-p".to_string(),
                    backdrop_property(monitor),
                    "-s".to_string(),
                    path.display().to_string(),
                ]
            })
            .collect()
    }
}

impl WallpaperSetter for Xfce4Setter {
    fn apply(&self, path: &Path) -> Result<()> {
        // A monitor that cannot be updated does not stop the rest.
        let mut first_err = None;
        for invocation in self.invocations(path) {
            if let Err(err) = run(&invocation) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn backdrop_property(monitor: u32) -> String {
    format!("/backdrop/screen0/monitor{}/workspace0/last-image", monitor)
}

/// macOS setter instructing Finder over the scripting bridge.
pub struct FinderSetter;

impl FinderSetter {
    fn script(path: &Path) -> String {
        format!(
            "tell application \"Finder\" to set desktop picture to POSIX file \"{}\"",
            path.display()
        )
    }
}

impl WallpaperSetter for FinderSetter {
    fn apply(&self, path: &Path) -> Result<()> {
        run(&[
            "osascript".to_string(),
            "-e".to_string(),
            Self::script(path),
        ])
    }
}

// Waits for the command but never inspects its exit status; only a spawn
// failure is reported.
fn run(invocation: &[String]) -> Result<()> {
    let Some((program, args)) = invocation.split_first() else {
        return Ok(());
    };
    Command::new(program)
        .args(args)
        .status()
        .map_err(|source| RedpaperError::Apply {
            command: invocation.join(" "),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn feh_invocation_appends_the_image_path() {
        let invocation = FehSetter::invocation(&PathBuf::from("/tmp/a.jpg"));
        assert_eq!(invocation, vec!["feh", "--bg-scale", "/tmp/a.jpg"]);
    }

    #[test]
    fn xfce4_targets_each_monitor_exactly_once() {
        let setter = Xfce4Setter { monitors: 3 };
        let invocations = setter.invocations(&PathBuf::from("/tmp/a.jpg"));
        assert_eq!(invocations.len(), 3);
        for (monitor, invocation) in invocations.iter().enumerate() {
            assert_eq!(invocation[0], "xfconf-query");
            assert!(invocation.contains(&backdrop_property(monitor as u32)));
            assert_eq!(invocation.last().unwrap(), "/tmp/a.jpg");
        }
    }

    #[test]
    fn backdrop_properties_are_distinct_per_monitor() {
        assert_eq!(
            backdrop_property(0),
            "/backdrop/screen0/monitor0/workspace0/last-image"
        );
        assert_ne!(backdrop_property(1), backdrop_property(2));
    }

    #[test]
    fn finder_script_references_the_posix_path() {
        let script = FinderSetter::script(&PathBuf::from("/tmp/a.jpg"));
        assert!(script.starts_with("tell application \"Finder\""));
        assert!(script.contains("POSIX file \"/tmp/a.jpg\""));
    }
}
