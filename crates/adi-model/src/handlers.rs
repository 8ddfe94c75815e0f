// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Default method handlers for devices and channels.
//!
//! The handlers drive the state machines only: mode changes on
//! `GotoOperating`/`GotoMaintenance`, PackML commands on the sub-machine of
//! the channel's current mode, and `StartSingleAcquisition`. Configuration
//! methods (`GetConfiguration` and friends) are left unbound.
//!
//! Handlers hold weak references to their objects.

use std::sync::{Arc, Weak};

use adi_core::{CallContext, Node, NodeError, NodeId, NodeRef, NodeResult};

use crate::device::{AnalyserChannel, AnalyserDevice};
use crate::methods::bind;
use crate::names;
use crate::types::ExecutionCycle;

// =============================================================================
// PackML commands
// =============================================================================

/// A channel command and the transition it performs.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    /// Method name.
    pub name: &'static str,
    /// States the command is accepted in.
    pub from: &'static [&'static str],
    /// Transient state entered first.
    pub acting: &'static str,
    /// State the command completes in.
    pub target: &'static str,
}

const RUNNING: &[&str] = &[
    "Clearing", "Stopped", "Starting", "Idle", "Suspended", "Execute", "Stopping", "Holding",
    "Held", "Unholding", "Suspending", "Unsuspending", "Resetting", "Completing", "Complete",
];

/// The channel commands.
pub const COMMANDS: [Command; 9] = [
    Command { name: names::RESET, from: &["Complete", "Stopped"], acting: "Resetting", target: "Idle" },
    Command { name: names::START, from: &["Idle"], acting: "Starting", target: "Execute" },
    Command {
        name: names::STOP,
        from: &[
            "Idle", "Starting", "Execute", "Suspended", "Held", "Holding", "Unholding",
            "Suspending", "Unsuspending", "Resetting", "Completing", "Complete",
        ],
        acting: "Stopping",
        target: "Stopped",
    },
    Command { name: names::HOLD, from: &["Execute"], acting: "Holding", target: "Held" },
    Command { name: names::UNHOLD, from: &["Held"], acting: "Unholding", target: "Execute" },
    Command { name: names::SUSPEND, from: &["Execute"], acting: "Suspending", target: "Suspended" },
    Command { name: names::UNSUSPEND, from: &["Suspended"], acting: "Unsuspending", target: "Execute" },
    Command { name: names::ABORT, from: RUNNING, acting: "Aborting", target: "Aborted" },
    Command { name: names::CLEAR, from: &["Aborted"], acting: "Clearing", target: "Stopped" },
];

/// Looks up a command by method name.
pub fn command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Applies `command` to the sub-machine of the channel's current mode.
///
/// # Errors
///
/// - `MethodFailed` if the command is unknown or not accepted in the
///   current state
/// - `InvalidState` if the channel's mode has no sub-machine
pub fn apply_command(channel: &AnalyserChannel, name: &str) -> NodeResult<()> {
    let command = command(name)
        .ok_or_else(|| NodeError::method_failed(name, "unknown channel command"))?;
    let machine = channel.active_mode_state()?;
    let current = machine.current_state()?.unwrap_or_default();
    if !command.from.contains(&current.as_str()) {
        return Err(NodeError::method_failed(
            command.name,
            format!("not accepted in state '{}'", current),
        ));
    }

    machine.set_current_state(command.acting)?;
    machine.set_current_state(command.target)?;
    for sub in machine.active_sub_machines()? {
        sub.reset()?;
    }
    tracing::info!(
        channel = %channel.node().node_id(),
        command = command.name,
        from = %current,
        to = command.target,
        "Channel command applied"
    );
    Ok(())
}

// =============================================================================
// Installation
// =============================================================================

fn upgrade(node: &Weak<Node>, method: &str) -> NodeResult<NodeRef> {
    node.upgrade()
        .ok_or_else(|| NodeError::method_failed(method, "object no longer exists"))
}

/// Binds the default handlers of a device and all its channels.
pub fn install_device_handlers(device: &AnalyserDevice) -> NodeResult<()> {
    let weak = Arc::downgrade(device.node());

    for (method, mode) in [
        (names::GOTO_OPERATING, "Operating"),
        (names::GOTO_MAINTENANCE, "Maintenance"),
    ] {
        let weak = weak.clone();
        bind(&device.method(method)?, move |_: &CallContext, _: &NodeId, (): ()| {
            let device = AnalyserDevice::wrap(upgrade(&weak, method)?);
            device.state_machine()?.set_current_state(mode)
        })?;
    }

    for (method, command) in [
        (names::RESET_ALL_CHANNELS, names::RESET),
        (names::START_ALL_CHANNELS, names::START),
        (names::STOP_ALL_CHANNELS, names::STOP),
        (names::ABORT_ALL_CHANNELS, names::ABORT),
    ] {
        let weak = weak.clone();
        bind(&device.method(method)?, move |_: &CallContext, _: &NodeId, (): ()| {
            let device = AnalyserDevice::wrap(upgrade(&weak, method)?);
            let mut first_error = None;
            for channel in device.channels() {
                if let Err(error) = apply_command(&channel, command) {
                    tracing::warn!(channel = channel.name(), command, error = %error, "Channel skipped");
                    first_error.get_or_insert(error);
                }
            }
            first_error.map_or(Ok(()), Err)
        })?;
    }

    for channel in device.channels() {
        install_channel_handlers(&channel)?;
    }
    tracing::debug!(device = %device.node().node_id(), "Default handlers installed");
    Ok(())
}

/// Binds the default handlers of a channel.
pub fn install_channel_handlers(channel: &AnalyserChannel) -> NodeResult<()> {
    let weak = Arc::downgrade(channel.node());

    for (method, mode) in [
        (names::GOTO_OPERATING, "Operating"),
        (names::GOTO_MAINTENANCE, "Maintenance"),
    ] {
        let weak = weak.clone();
        bind(&channel.method(method)?, move |_: &CallContext, _: &NodeId, (): ()| {
            let channel = AnalyserChannel::wrap(upgrade(&weak, method)?);
            channel.state_machine()?.set_current_state(mode)
        })?;
    }

    for command in &COMMANDS {
        let weak = weak.clone();
        let name = command.name;
        bind(&channel.method(name)?, move |_: &CallContext, _: &NodeId, (): ()| {
            let channel = AnalyserChannel::wrap(upgrade(&weak, name)?);
            apply_command(&channel, name)
        })?;
    }

    let method = names::START_SINGLE_ACQUISITION;
    bind(
        &channel.method(method)?,
        move |_: &CallContext, _: &NodeId, (cycle, subcode, stream): (ExecutionCycle, u32, String)| {
            let channel = AnalyserChannel::wrap(upgrade(&weak, method)?);
            start_single_acquisition(&channel, cycle, subcode, &stream)
        },
    )?;
    Ok(())
}

/// Starts one acquisition of `stream` on an idle channel.
///
/// # Errors
///
/// - `MethodFailed` if the stream does not exist or the channel is not idle
pub fn start_single_acquisition(
    channel: &AnalyserChannel,
    cycle: ExecutionCycle,
    subcode: u32,
    stream: &str,
) -> NodeResult<()> {
    let method = names::START_SINGLE_ACQUISITION;
    let target = channel
        .stream(stream)
        .map_err(|_| NodeError::method_failed(method, format!("unknown stream '{}'", stream)))?;
    if !channel.active_mode_state()?.is_in("Idle")? {
        return Err(NodeError::method_failed(method, "channel is not idle"));
    }

    channel.execution_cycle()?.set(cycle)?;
    channel.execution_cycle_subcode()?.set(subcode)?;
    channel.active_stream()?.set(stream.to_string())?;
    target.execution_cycle()?.set(cycle)?;
    target.execution_cycle_subcode()?.set(subcode)?;
    target.is_active()?.set(true)?;
    apply_command(channel, names::START)
}

// =============================================================================
// Tests
// =============================================================================
