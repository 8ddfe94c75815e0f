// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `browse` command.

use adi_core::{render_tree, BrowseNode};
use adi_model::{AdiModel, ModelBuilder};
use tracing::{debug, info};

use super::{load_config, render};
use crate::cli::{BrowseArgs, Cli, OutputFormat};
use crate::error::{BinError, BinResult};

/// Executes the `browse` command.
pub fn browse(cli: &Cli, args: BrowseArgs) -> BinResult<()> {
    let config = load_config(cli)?;
    let model = ModelBuilder::new(config).build()?;

    let tree = snapshot(&model, &args)?;
    info!(nodes = tree.count(), "Address space snapshot taken");

    match args.format {
        OutputFormat::Text => print!("{}", render_tree(&tree)),
        format => println!("{}", render(&tree, format)?),
    }
    Ok(())
}

/// Takes the browse snapshot `args` asks for.
fn snapshot(model: &AdiModel, args: &BrowseArgs) -> BinResult<BrowseNode> {
    let space = model.space();
    if args.all {
        let created = space.materialize_all()?;
        debug!(created, "Optional slots materialized");
    }

    let root = match &args.path {
        Some(path) => space
            .find_path(path)?
            .ok_or_else(|| BinError::not_found(format!("browse path '{}'", path)))?,
        None => space.objects_folder().clone(),
    };
    Ok(BrowseNode::from_node(&root, args.depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adi_config::{load_config_str, ConfigFormat};

    fn model() -> AdiModel {
        let config = load_config_str(
            "devices:\n  - name: Analyser1\n    channels:\n      - name: Channel1\n",
            ConfigFormat::Yaml,
        )
        .unwrap();
        ModelBuilder::new(config).build().unwrap()
    }

    #[test]
    fn test_snapshot_subtree() {
        let model = model();
        let args = BrowseArgs {
            path: Some("DeviceSet/Analyser1".to_string()),
            depth: Some(1),
            ..Default::default()
        };
        let tree = snapshot(&model, &args).unwrap();
        assert_eq!(tree.browse_name.name, "Analyser1");
        assert!(tree.child("Channel1").is_some());
        assert!(tree.child("Channel1").unwrap().children.is_empty());
    }

    #[test]
    fn test_snapshot_materialize_all() {
        let model = model();
        let path = BrowseArgs {
            path: Some("DeviceSet/Analyser1/Channel1".to_string()),
            ..Default::default()
        };
        let before = snapshot(&model, &path).unwrap();
        assert!(before.child("ActiveStream").is_none());

        let all = BrowseArgs { all: true, ..path };
        let after = snapshot(&model, &all).unwrap();
        assert!(after.child("ActiveStream").is_some());
        assert!(after.count() > before.count());
    }

    #[test]
    fn test_snapshot_unknown_path() {
        let model = model();
        let args = BrowseArgs {
            path: Some("DeviceSet/Missing".to_string()),
            ..Default::default()
        };
        let err = snapshot(&model, &args).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
