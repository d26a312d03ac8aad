//! Host-side interface: the capability trait a simulated device implements
//! and the registry a host protocol engine resolves devices through.
//!
//! A host protocol engine (command parsing, buffer triggers, transport
//! framing) lives outside this crate. What this module fixes is the contract
//! between such an engine and a simulated device:
//!
//! - [`ScanDevice`] — the lifecycle and attribute callbacks the host invokes,
//!   one implementation per simulated device;
//! - [`DeviceRegistration`] — the static metadata (channels, attribute
//!   lists) published when a device is added;
//! - [`DeviceRegistry`] — handle-based resolution of registered devices.
//!   Looking up a handle that was never issued, or whose device has been
//!   removed, fails with [`DeviceError::NoDevice`]; that is the only place
//!   an "absent device" can be observed.
//!
//! The host serializes calls: a registered device is driven by one command
//! at a time and never reentered, so implementations do no locking.

use crate::channel::ChannelDesc;
use crate::error::DeviceError;

/// Channel context accompanying per-channel attribute calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Index of the addressed channel.
    pub ch_num: usize,
}

/// One attribute a device exposes: a host-visible name bound to the id the
/// device's dispatch recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDesc {
    pub name: &'static str,
    pub id: u32,
}

/// Callbacks the host invokes on a simulated device over its lifecycle.
///
/// Every method runs synchronously to completion on the calling thread and
/// either finishes fully or fails leaving device state unmutated.
pub trait ScanDevice {
    /// Replace the active-channel mask ahead of a scan.
    fn enable(&mut self, mask: u32) -> Result<(), DeviceError>;

    /// Clear the active-channel mask; the device goes idle.
    fn disable(&mut self) -> Result<(), DeviceError>;

    /// Fill `buf` with `samples` interleaved sample instants and return the
    /// number of instants produced.
    fn read_samples(&mut self, buf: &mut [u16], samples: u32) -> Result<u32, DeviceError>;

    /// Read one byte from the debug register bank.
    fn debug_reg_read(&mut self, reg: u8) -> Result<u8, DeviceError>;

    /// Write one byte to the debug register bank.
    fn debug_reg_write(&mut self, reg: u8, value: u8) -> Result<(), DeviceError>;

    /// Format the attribute identified by `attr` as text into `buf`,
    /// returning the number of bytes written. Per-channel attributes carry
    /// the addressed channel in `channel`.
    fn attr_show(
        &self,
        buf: &mut [u8],
        channel: Option<&ChannelInfo>,
        attr: u32,
    ) -> Result<usize, DeviceError>;

    /// Parse `input` and store it into the attribute identified by `attr`,
    /// returning the number of input bytes consumed.
    fn attr_store(
        &mut self,
        input: &[u8],
        channel: Option<&ChannelInfo>,
        attr: u32,
    ) -> Result<usize, DeviceError>;
}

/// Static registration metadata for one simulated device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRegistration {
    /// Host-visible device name.
    pub name: String,
    /// Per-channel metadata, one entry per channel.
    pub channels: Vec<ChannelDesc>,
    /// Attributes that apply to the device as a whole.
    pub global_attributes: Vec<AttrDesc>,
    /// Attributes that apply to each channel individually.
    pub channel_attributes: Vec<AttrDesc>,
}

impl DeviceRegistration {
    /// Number of channels the device publishes.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}

/// Stable handle identifying a registered device.
///
/// Handles stay valid across registrations and removals of other devices;
/// after the device behind a handle is removed, every use of that handle
/// fails with [`DeviceError::NoDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(usize);

struct RegisteredDevice<'a> {
    registration: DeviceRegistration,
    device: Box<dyn ScanDevice + 'a>,
}

/// Registry of simulated devices a host resolves handles through.
///
/// ```
/// use adcsim::{AdcDevice, AdcInitParam, DeviceError, DeviceRegistry, adc_registration};
///
/// let mut registry = DeviceRegistry::new();
/// let handle = registry.register(
///     adc_registration("adc_demo"),
///     Box::new(AdcDevice::new(AdcInitParam::default())),
/// );
///
/// registry.get_mut(handle).unwrap().enable(0x1).unwrap();
///
/// registry.remove(handle).unwrap();
/// assert_eq!(registry.get(handle).err(), Some(DeviceError::NoDevice));
/// ```
#[derive(Default)]
pub struct DeviceRegistry<'a> {
    slots: Vec<Option<RegisteredDevice<'a>>>,
}

impl<'a> DeviceRegistry<'a> {
    /// Create an empty registry.
    pub fn new() -> Self {
        DeviceRegistry { slots: Vec::new() }
    }

    /// Add a device with its registration metadata and return its handle.
    pub fn register(
        &mut self,
        registration: DeviceRegistration,
        device: Box<dyn ScanDevice + 'a>,
    ) -> DeviceHandle {
        // Vacated slots are never reused, so a stale handle can only ever
        // observe NoDevice, not some later registration.
        self.slots.push(Some(RegisteredDevice {
            registration,
            device,
        }));
        DeviceHandle(self.slots.len() - 1)
    }

    /// Resolve a handle to a shared device reference.
    pub fn get(&self, handle: DeviceHandle) -> Result<&dyn ScanDevice, DeviceError> {
        self.slots
            .get(handle.0)
            .and_then(|slot| slot.as_ref())
            .map(|entry| entry.device.as_ref())
            .ok_or(DeviceError::NoDevice)
    }

    /// Resolve a handle to an exclusive device reference.
    pub fn get_mut(&mut self, handle: DeviceHandle) -> Result<&mut (dyn ScanDevice + 'a), DeviceError> {
        self.slots
            .get_mut(handle.0)
            .and_then(|slot| slot.as_mut())
            .map(|entry| entry.device.as_mut())
            .ok_or(DeviceError::NoDevice)
    }

    /// Registration metadata for a handle.
    pub fn registration(&self, handle: DeviceHandle) -> Result<&DeviceRegistration, DeviceError> {
        self.slots
            .get(handle.0)
            .and_then(|slot| slot.as_ref())
            .map(|entry| &entry.registration)
            .ok_or(DeviceError::NoDevice)
    }

    /// Look a device up by its registered name.
    pub fn find(&self, name: &str) -> Option<DeviceHandle> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            slot.as_ref()
                .filter(|entry| entry.registration.name == name)
                .map(|_| DeviceHandle(index))
        })
    }

    /// Remove the device behind `handle`, dropping its state. The handle
    /// becomes stale; further use fails with [`DeviceError::NoDevice`].
    /// An externally supplied sample buffer is borrowed, not owned, and is
    /// untouched by removal.
    pub fn remove(&mut self, handle: DeviceHandle) -> Result<(), DeviceError> {
        let slot = self
            .slots
            .get_mut(handle.0)
            .filter(|slot| slot.is_some())
            .ok_or(DeviceError::NoDevice)?;
        *slot = None;
        Ok(())
    }

    /// Number of currently registered devices.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// `true` when no devices are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
