// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use logger::*;

use std::path::Path;
use std::process::Command;

fn viewer(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(&["/C", "start", ""]).arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Hand a chart to the platform viewer and wait for the launcher to return.
/// Charts are already on disk, so failures here are only reported.
pub fn show(path: &Path) {
    debug!("opening {}", path.display());
    match viewer(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("viewer for {} exited with {}", path.display(), status),
        Err(e) => warn!("failed to open {}: {}", path.display(), e),
    }
}
