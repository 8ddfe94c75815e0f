// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Type and browse names used by the ADI model.

// =============================================================================
// Object types
// =============================================================================

/// Type names.
pub mod types {
    /// Functional group folder.
    pub const FUNCTIONAL_GROUP: &str = "FunctionalGroupType";
    /// Abstract topology element.
    pub const TOPOLOGY_ELEMENT: &str = "TopologyElementType";
    /// Abstract device.
    pub const DEVICE: &str = "DeviceType";
    /// Analyser device.
    pub const ANALYSER_DEVICE: &str = "AnalyserDeviceType";
    /// Spectrometer device.
    pub const SPECTROMETER_DEVICE: &str = "SpectrometerDeviceType";
    /// Particle size monitor device.
    pub const PARTICLE_SIZE_MONITOR_DEVICE: &str = "ParticleSizeMonitorDeviceType";
    /// Chromatograph device.
    pub const CHROMATOGRAPH_DEVICE: &str = "ChromatographDeviceType";
    /// Mass spectrometer device.
    pub const MASS_SPECTROMETER_DEVICE: &str = "MassSpectrometerDeviceType";
    /// Acoustic spectrometer device.
    pub const ACOUSTIC_SPECTROMETER_DEVICE: &str = "AcousticSpectrometerDeviceType";
    /// NMR device.
    pub const NMR_DEVICE: &str = "NMRDeviceType";
    /// Analyser channel.
    pub const ANALYSER_CHANNEL: &str = "AnalyserChannelType";
    /// Stream.
    pub const STREAM: &str = "StreamType";
    /// Spectrometer stream.
    pub const SPECTROMETER_DEVICE_STREAM: &str = "SpectrometerDeviceStreamType";
    /// Accessory.
    pub const ACCESSORY: &str = "AccessoryType";
    /// Detector accessory.
    pub const DETECTOR: &str = "DetectorType";
    /// Smart sampling system accessory.
    pub const SMART_SAMPLING_SYSTEM: &str = "SmartSamplingSystemType";
    /// Source accessory.
    pub const SOURCE: &str = "SourceType";
    /// Accessory slot.
    pub const ACCESSORY_SLOT: &str = "AccessorySlotType";
    /// Device state machine.
    pub const ANALYSER_DEVICE_STATE_MACHINE: &str = "AnalyserDeviceStateMachineType";
    /// Channel state machine.
    pub const ANALYSER_CHANNEL_STATE_MACHINE: &str = "AnalyserChannelStateMachineType";
    /// Channel operating sub-machine.
    pub const ANALYSER_CHANNEL_OPERATING_STATE: &str = "AnalyserChannelOperatingStateType";
    /// Channel local sub-machine.
    pub const ANALYSER_CHANNEL_LOCAL_STATE: &str = "AnalyserChannelLocalStateType";
    /// Channel maintenance sub-machine.
    pub const ANALYSER_CHANNEL_MAINTENANCE_STATE: &str = "AnalyserChannelMaintenanceStateType";
    /// Execute sub-machine of the operating mode.
    pub const OPERATING_EXECUTE_STATE_MACHINE: &str =
        "AnalyserChannel_OperatingModeExecuteSubStateMachineType";
    /// Accessory slot state machine.
    pub const ACCESSORY_SLOT_STATE_MACHINE: &str = "AccessorySlotStateMachineType";
}

// =============================================================================
// Browse names
// =============================================================================

/// Configuration group.
pub const CONFIGURATION: &str = "Configuration";
/// Status group.
pub const STATUS: &str = "Status";
/// Factory settings group.
pub const FACTORY_SETTINGS: &str = "FactorySettings";
/// Identification group.
pub const IDENTIFICATION: &str = "Identification";
/// Acquisition settings group.
pub const ACQUISITION_SETTINGS: &str = "AcquisitionSettings";
/// Acquisition status group.
pub const ACQUISITION_STATUS: &str = "AcquisitionStatus";
/// Acquisition data group.
pub const ACQUISITION_DATA: &str = "AcquisitionData";

// Device identification
/// Serial number property.
pub const SERIAL_NUMBER: &str = "SerialNumber";
/// Revision counter property.
pub const REVISION_COUNTER: &str = "RevisionCounter";
/// Manufacturer property.
pub const MANUFACTURER: &str = "Manufacturer";
/// Model property.
pub const MODEL: &str = "Model";
/// Device manual property.
pub const DEVICE_MANUAL: &str = "DeviceManual";
/// Device revision property.
pub const DEVICE_REVISION: &str = "DeviceRevision";
/// Software revision property.
pub const SOFTWARE_REVISION: &str = "SoftwareRevision";
/// Hardware revision property.
pub const HARDWARE_REVISION: &str = "HardwareRevision";

// State machines
/// Device state machine slot.
pub const ANALYSER_STATE_MACHINE: &str = "AnalyserStateMachine";
/// Channel state machine slot.
pub const CHANNEL_STATE_MACHINE: &str = "ChannelStateMachine";
/// Operating sub-machine slot.
pub const OPERATING_SUB_STATE_MACHINE: &str = "OperatingSubStateMachine";
/// Local sub-machine slot.
pub const LOCAL_SUB_STATE_MACHINE: &str = "LocalSubStateMachine";
/// Maintenance sub-machine slot.
pub const MAINTENANCE_SUB_STATE_MACHINE: &str = "MaintenanceSubStateMachine";
/// Execute sub-machine slot.
pub const OPERATING_EXECUTE_SUB_STATE_MACHINE: &str = "OperatingExecuteSubStateMachine";
/// Accessory slot state machine slot.
pub const ACCESSORY_SLOT_STATE_MACHINE: &str = "AccessorySlotStateMachine";

// Channel and stream variables
/// Channel id property.
pub const CHANNEL_ID: &str = "ChannelId";
/// Enabled flag.
pub const IS_ENABLED: &str = "IsEnabled";
/// Active flag.
pub const IS_ACTIVE: &str = "IsActive";
/// Hot-swap flag.
pub const IS_HOT_SWAPPABLE: &str = "IsHotSwappable";
/// Current execution cycle.
pub const EXECUTION_CYCLE: &str = "ExecutionCycle";
/// Vendor subcode of the execution cycle.
pub const EXECUTION_CYCLE_SUBCODE: &str = "ExecutionCycleSubcode";
/// Progress of the current cycle, in percent.
pub const PROGRESS: &str = "Progress";
/// Stream currently acquired by a channel.
pub const ACTIVE_STREAM: &str = "ActiveStream";
/// Acquisition counter.
pub const ACQUISITION_COUNTER: &str = "AcquisitionCounter";
/// Acquisition result status.
pub const ACQUISITION_RESULT_STATUS: &str = "AcquisitionResultStatus";
/// End time of the last acquisition.
pub const ACQUISITION_END_TIME: &str = "AcquisitionEndTime";
/// Scaled measurement data.
pub const SCALED_DATA: &str = "ScaledData";
/// Raw measurement data.
pub const RAW_DATA: &str = "RawData";

// Methods
/// Reads the device configuration.
pub const GET_CONFIGURATION: &str = "GetConfiguration";
/// Writes the device configuration.
pub const SET_CONFIGURATION: &str = "SetConfiguration";
/// Returns the configuration digest.
pub const GET_CONFIG_DATA_DIGEST: &str = "GetConfigDataDigest";
/// Compares a digest with the current configuration.
pub const COMPARE_CONFIG_DATA_DIGEST: &str = "CompareConfigDataDigest";
/// Starts one acquisition on a channel.
pub const START_SINGLE_ACQUISITION: &str = "StartSingleAcquisition";
/// Moves a device or channel to Operating.
pub const GOTO_OPERATING: &str = "GotoOperating";
/// Moves a device or channel to Maintenance.
pub const GOTO_MAINTENANCE: &str = "GotoMaintenance";

/// Returns a channel to Idle.
pub const RESET: &str = "Reset";
/// Starts a channel.
pub const START: &str = "Start";
/// Stops a channel.
pub const STOP: &str = "Stop";
/// Holds a running channel.
pub const HOLD: &str = "Hold";
/// Resumes a held channel.
pub const UNHOLD: &str = "Unhold";
/// Suspends a running channel.
pub const SUSPEND: &str = "Suspend";
/// Resumes a suspended channel.
pub const UNSUSPEND: &str = "Unsuspend";
/// Aborts a channel.
pub const ABORT: &str = "Abort";
/// Clears an aborted channel.
pub const CLEAR: &str = "Clear";
/// Resets every channel of a device.
pub const RESET_ALL_CHANNELS: &str = "ResetAllChannels";
/// Starts every channel of a device.
pub const START_ALL_CHANNELS: &str = "StartAllChannels";
/// Stops every channel of a device.
pub const STOP_ALL_CHANNELS: &str = "StopAllChannels";
/// Aborts every channel of a device.
pub const ABORT_ALL_CHANNELS: &str = "AbortAllChannels";
