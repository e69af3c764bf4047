// SPDX-License-Identifier: MIT OR Apache-2.0

//! The device path data model: node headers, the unsized path/node/instance
//! types, traversal, sizing, and framing validation.
//!
//! A device path is a packed list of variable-length nodes terminated by an
//! [`END_ENTIRE`] node. A path _may_ contain multiple path instances
//! separated by [`END_INSTANCE`] nodes; only the final instance is
//! terminated by [`END_ENTIRE`].
//!
//! ```text
//! ┌──────┬─────┬──────────────╥───────┬──────────┬────────────┐
//! │ ACPI │ PCI │ END_INSTANCE ║ CDROM │ FILEPATH │ END_ENTIRE │
//! └──────┴─────┴──────────────╨───────┴──────────┴────────────┘
//! ↑                           ↑                               ↑
//! ├─── DevicePathInstance ────╨────── DevicePathInstance ─────┤
//! │                                                           │
//! └─────────────────── Entire DevicePath ─────────────────────┘
//! ```
//!
//! All of these types use a packed layout and may appear on any byte
//! boundary. References to them are only ever produced by
//! [`DevicePath::try_from_bytes`] and [`DevicePathNode::try_from_bytes`],
//! which fully validate the framing first; iteration over a validated path
//! cannot read outside its buffer.
//!
//! [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
//! [`END_INSTANCE`]: DeviceSubType::END_INSTANCE

use crate::nodes::DevicePathNodeEnum;
use crate::{arith, Error, Result};
use core::fmt::{self, Debug, Formatter};
use core::mem;
use ptr_meta::Pointee;

/// Size in bytes of a [`DevicePathHeader`].
pub(crate) const HEADER_SIZE: usize = mem::size_of::<DevicePathHeader>();

/// Header that appears at the start of every [`DevicePathNode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C, packed)]
pub struct DevicePathHeader {
    /// Type of device
    pub device_type: DeviceType,
    /// Sub type of device
    pub sub_type: DeviceSubType,
    /// Size (in bytes) of the [`DevicePathNode`], including this header.
    pub length: u16,
}

impl DevicePathHeader {
    /// Decode a header from the front of `bytes`.
    ///
    /// Fails with [`Error::Malformed`] if fewer than four bytes are
    /// present or the declared length is smaller than the header itself.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::Malformed);
        }
        let length = u16::from_le_bytes([bytes[2], bytes[3]]);
        if usize::from(length) < HEADER_SIZE {
            return Err(Error::Malformed);
        }
        Ok(Self {
            device_type: DeviceType(bytes[0]),
            sub_type: DeviceSubType(bytes[1]),
            length,
        })
    }

    /// Write the four header bytes to the front of `out`.
    ///
    /// `out` must be at least [`HEADER_SIZE`] bytes; the caller has already
    /// sized it against `self.length`.
    pub(crate) fn write_to(self, out: &mut [u8]) {
        out[0] = self.device_type.0;
        out[1] = self.sub_type.0;
        out[2..4].copy_from_slice(&self.length.to_le_bytes());
    }
}

/// A single node within a [`DevicePath`].
///
/// Each node starts with a [`DevicePathHeader`]. The rest of the data in
/// the node depends on the type of node. Use [`DevicePathNode::as_enum`]
/// to decode the payload into a typed representation.
#[derive(Eq, Pointee)]
#[repr(C, packed)]
pub struct DevicePathNode {
    header: DevicePathHeader,
    data: [u8],
}

impl DevicePathNode {
    /// Create a [`DevicePathNode`] reference from the front of `bytes`.
    ///
    /// Fails with [`Error::Malformed`] if the header is truncated, claims a
    /// length smaller than the header, or claims a length that runs past
    /// the end of `bytes`.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = DevicePathHeader::try_from_bytes(bytes)?;
        let length = usize::from(header.length);
        if bytes.len() < length {
            return Err(Error::Malformed);
        }
        // SAFETY: the node's declared length is in bounds of `bytes`, and
        // the returned reference borrows from it.
        Ok(unsafe { Self::from_bytes_unchecked(&bytes[..length]) })
    }

    /// Reconstruct a node reference from bytes already known to hold
    /// exactly one well-framed node.
    ///
    /// # Safety
    ///
    /// `bytes` must be at least [`HEADER_SIZE`] long and exactly as long as
    /// the length field at offset 2 claims.
    pub(crate) unsafe fn from_bytes_unchecked(bytes: &[u8]) -> &Self {
        let data_len = bytes.len() - HEADER_SIZE;
        &*ptr_meta::from_raw_parts(bytes.as_ptr().cast(), data_len)
    }

    /// Read a node from the front of bytes that were validated when the
    /// containing path reference was created.
    ///
    /// # Safety
    ///
    /// The node starting at `bytes[0]` must lie entirely within `bytes`.
    unsafe fn first_node_unchecked(bytes: &[u8]) -> &Self {
        let length = usize::from(u16::from_le_bytes([bytes[2], bytes[3]]));
        Self::from_bytes_unchecked(&bytes[..length])
    }

    /// Type of device
    #[must_use]
    pub const fn device_type(&self) -> DeviceType {
        self.header.device_type
    }

    /// Sub type of device
    #[must_use]
    pub const fn sub_type(&self) -> DeviceSubType {
        self.header.sub_type
    }

    /// Tuple of the node's type and subtype.
    #[must_use]
    pub const fn full_type(&self) -> (DeviceType, DeviceSubType) {
        (self.header.device_type, self.header.sub_type)
    }

    /// Size (in bytes) of the full [`DevicePathNode`], including the header.
    #[must_use]
    pub const fn length(&self) -> u16 {
        self.header.length
    }

    /// The node's payload, i.e. everything after the header.
    #[must_use]
    pub const fn data(&self) -> &[u8] {
        &self.data
    }

    /// True if this node ends an entire [`DevicePath`].
    #[must_use]
    pub fn is_end_entire(&self) -> bool {
        self.full_type() == (DeviceType::END, DeviceSubType::END_ENTIRE)
    }

    /// True if this node ends one instance of a multi-instance
    /// [`DevicePath`].
    #[must_use]
    pub fn is_end_instance(&self) -> bool {
        self.full_type() == (DeviceType::END, DeviceSubType::END_INSTANCE)
    }

    /// The raw bytes of the node, header included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let ptr: *const Self = self;
        // SAFETY: the reference covers exactly `length` bytes by
        // construction.
        unsafe { core::slice::from_raw_parts(ptr.cast::<u8>(), mem::size_of_val(self)) }
    }

    /// Decode the payload into a typed per-class representation.
    ///
    /// Fails with [`Error::Unsupported`] for an unrecognized top-level type
    /// and [`Error::Malformed`] if the payload is too short for the node's
    /// fixed layout.
    pub fn as_enum(&self) -> Result<DevicePathNodeEnum> {
        DevicePathNodeEnum::try_from(self)
    }
}

impl Debug for DevicePathNode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DevicePathNode")
            .field("header", &self.header)
            .field("data", &&self.data)
            .finish()
    }
}

impl PartialEq for DevicePathNode {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.data == other.data
    }
}

/// A single device path instance that ends with either an [`END_INSTANCE`]
/// or [`END_ENTIRE`] node. Use [`DevicePath::instance_iter`] to get the
/// path instances in a [`DevicePath`].
///
/// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
/// [`END_INSTANCE`]: DeviceSubType::END_INSTANCE
#[repr(C, packed)]
#[derive(Eq, Pointee)]
pub struct DevicePathInstance {
    data: [u8],
}

impl DevicePathInstance {
    /// Get an iterator over the [`DevicePathNodes`] in this instance.
    /// Iteration ends when any [`DeviceType::END`] node is reached; the
    /// end node itself is not returned.
    ///
    /// [`DevicePathNodes`]: DevicePathNode
    #[must_use]
    pub const fn node_iter(&self) -> DevicePathNodeIterator {
        DevicePathNodeIterator {
            nodes: &self.data,
            stop_condition: StopCondition::AnyEndNode,
        }
    }

    /// Size of this instance in bytes, including its terminating end node.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.data.len()
    }
}

impl Debug for DevicePathInstance {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DevicePathInstance")
            .field("data", &&self.data)
            .finish()
    }
}

impl PartialEq for DevicePathInstance {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// A full device path: one or more instances of variable-length nodes,
/// ending with an [`END_ENTIRE`] node.
///
/// See the [module-level documentation] for more details.
///
/// [module-level documentation]: crate::path
/// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
#[repr(C, packed)]
#[derive(Eq, Pointee)]
pub struct DevicePath {
    data: [u8],
}

impl DevicePath {
    /// Create a [`DevicePath`] reference from the front of `bytes`.
    ///
    /// The framing of every node is validated up to and including the
    /// [`END_ENTIRE`] terminator; bytes past the terminator are ignored.
    /// Fails with [`Error::Malformed`] if any node header is truncated,
    /// claims a length smaller than the header, or runs past the end of
    /// `bytes`, or if the buffer ends before an [`END_ENTIRE`] node.
    ///
    /// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
    pub fn try_from_bytes(bytes: &[u8]) -> Result<&Self> {
        let size = path_len(bytes)?;
        // SAFETY: every node in the prefix has just been validated.
        Ok(unsafe { Self::from_bytes_unchecked(&bytes[..size]) })
    }

    /// Reconstruct a path reference from bytes already known to hold a
    /// well-framed, END_ENTIRE-terminated path.
    ///
    /// # Safety
    ///
    /// `bytes` must be exactly one valid device path, as produced by this
    /// crate or previously validated by [`Self::try_from_bytes`].
    pub(crate) unsafe fn from_bytes_unchecked(bytes: &[u8]) -> &Self {
        &*ptr_meta::from_raw_parts(bytes.as_ptr().cast(), bytes.len())
    }

    /// Total size of the path in bytes, summed across all instances and
    /// including the final [`END_ENTIRE`] node.
    ///
    /// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.data.len()
    }

    /// The raw bytes of the whole path, terminator included.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get an iterator over the [`DevicePathInstance`]s in this path.
    #[must_use]
    pub const fn instance_iter(&self) -> DevicePathInstanceIterator {
        DevicePathInstanceIterator {
            remaining_path: Some(self),
        }
    }

    /// Get an iterator over the [`DevicePathNode`]s starting at
    /// `self`. Iteration ends when a node is reached where
    /// [`is_end_entire`][DevicePathNode::is_end_entire] is true. That
    /// ending node is not returned by the iterator; [`END_INSTANCE`]
    /// terminators are.
    ///
    /// [`END_INSTANCE`]: DeviceSubType::END_INSTANCE
    #[must_use]
    pub const fn node_iter(&self) -> DevicePathNodeIterator {
        DevicePathNodeIterator {
            nodes: &self.data,
            stop_condition: StopCondition::EndEntireNode,
        }
    }

    /// True if the path holds more than one instance, i.e. any terminator
    /// before the final one is an [`END_INSTANCE`] node.
    ///
    /// [`END_INSTANCE`]: DeviceSubType::END_INSTANCE
    #[must_use]
    pub fn is_multi_instance(&self) -> bool {
        self.node_iter().any(|node| node.is_end_instance())
    }

    /// Split the path into its body and its final [`END_ENTIRE`] node.
    /// The body keeps any [`END_INSTANCE`] terminators.
    ///
    /// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
    /// [`END_INSTANCE`]: DeviceSubType::END_INSTANCE
    pub(crate) fn split_terminator(&self) -> (&[u8], &DevicePathNode) {
        let mut offset = 0;
        loop {
            // SAFETY: every node was validated when this reference was
            // created.
            let node = unsafe { DevicePathNode::first_node_unchecked(&self.data[offset..]) };
            if node.is_end_entire() {
                return (&self.data[..offset], node);
            }
            offset += usize::from(node.length());
        }
    }
}

impl Debug for DevicePath {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DevicePath")
            .field("data", &&self.data)
            .finish()
    }
}

impl PartialEq for DevicePath {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// Walk `bytes` node by node and return the total path size up to and
/// including the END_ENTIRE terminator.
fn path_len(bytes: &[u8]) -> Result<usize> {
    let mut offset = 0;
    loop {
        let node = DevicePathNode::try_from_bytes(&bytes[offset..])?;
        offset = arith::add(offset, usize::from(node.length()))?;
        if node.is_end_entire() {
            return Ok(offset);
        }
    }
}

/// Iterator over the [`DevicePathInstance`]s in a [`DevicePath`].
///
/// This struct is returned by [`DevicePath::instance_iter`].
#[derive(Debug)]
pub struct DevicePathInstanceIterator<'a> {
    remaining_path: Option<&'a DevicePath>,
}

impl<'a> Iterator for DevicePathInstanceIterator<'a> {
    type Item = &'a DevicePathInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining_path = self.remaining_path?;

        let mut instance_size: usize = 0;

        // Find the end of the instance, which can be either kind of end
        // node (end-instance or end-entire). Count the number of bytes
        // up to and including that end node.
        let node_iter = DevicePathNodeIterator {
            nodes: &remaining_path.data,
            stop_condition: StopCondition::NoMoreNodes,
        };
        for node in node_iter {
            instance_size += usize::from(node.length());
            if node.device_type() == DeviceType::END {
                break;
            }
        }

        let (head, rest) = remaining_path.data.split_at(instance_size);

        if rest.is_empty() {
            self.remaining_path = None;
        } else {
            self.remaining_path = unsafe {
                Some(&*ptr_meta::from_raw_parts(
                    rest.as_ptr().cast::<()>(),
                    rest.len(),
                ))
            };
        }

        unsafe {
            Some(&*ptr_meta::from_raw_parts(
                head.as_ptr().cast::<()>(),
                head.len(),
            ))
        }
    }
}

#[derive(Debug)]
enum StopCondition {
    AnyEndNode,
    EndEntireNode,
    NoMoreNodes,
}

/// Iterator over [`DevicePathNode`]s.
///
/// This struct is returned by [`DevicePath::node_iter`] and
/// [`DevicePathInstance::node_iter`].
#[derive(Debug)]
pub struct DevicePathNodeIterator<'a> {
    nodes: &'a [u8],
    stop_condition: StopCondition,
}

impl<'a> Iterator for DevicePathNodeIterator<'a> {
    type Item = &'a DevicePathNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.nodes.len() < HEADER_SIZE {
            return None;
        }

        // SAFETY: the underlying path was validated when the reference
        // was created, so each step stays in bounds.
        let node = unsafe { DevicePathNode::first_node_unchecked(self.nodes) };

        let stop = match self.stop_condition {
            StopCondition::AnyEndNode => node.device_type() == DeviceType::END,
            StopCondition::EndEntireNode => node.is_end_entire(),
            StopCondition::NoMoreNodes => false,
        };

        if stop {
            // Clear the remaining node data so that future calls to
            // next() immediately return `None`.
            self.nodes = &[];
            None
        } else {
            self.nodes = &self.nodes[usize::from(node.length())..];
            Some(node)
        }
    }
}

newtype_enum! {
/// Type identifier for a device path node.
pub enum DeviceType: u8 => {
    /// Hardware Device Path.
    ///
    /// This Device Path defines how a device is attached to the resource
    /// domain of a system, where resource domain is simply the shared
    /// memory, memory mapped I/O, and I/O space of the system.
    HARDWARE = 0x01,
    /// ACPI Device Path.
    ///
    /// This Device Path is used to describe devices whose enumeration is
    /// not described in an industry-standard fashion. These devices must
    /// be described using ACPI AML in the ACPI namespace; this Device Path
    /// is a linkage to the ACPI namespace.
    ACPI = 0x02,
    /// Messaging Device Path.
    ///
    /// This Device Path is used to describe the connection of devices
    /// outside the resource domain of the system. This Device Path can
    /// describe physical messaging information such as a SCSI ID, or
    /// abstract information such as networking protocol IP addresses.
    MESSAGING = 0x03,
    /// Media Device Path.
    ///
    /// This Device Path is used to describe the portion of a medium that
    /// is being abstracted by a boot service. For example, a Media Device
    /// Path could define which partition on a hard drive was being used.
    MEDIA = 0x04,
    /// BIOS Boot Specification Device Path.
    ///
    /// This Device Path is used to point to boot legacy operating
    /// systems; it is based on the BIOS Boot Specification Version 1.01.
    BIOS_BOOT_SPEC = 0x05,
    /// End of Hardware Device Path.
    ///
    /// Depending on the Sub-Type, this Device Path node is used to
    /// indicate the end of the Device Path instance or Device Path
    /// structure.
    END = 0x7F,
}}

/// Sub-type identifier for a device path node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeviceSubType(pub u8);

impl DeviceSubType {
    /// PCI Device Path.
    pub const HARDWARE_PCI: DeviceSubType = DeviceSubType(1);
    /// PCCARD Device Path.
    pub const HARDWARE_PCCARD: DeviceSubType = DeviceSubType(2);
    /// Memory-mapped Device Path.
    pub const HARDWARE_MEMORY_MAPPED: DeviceSubType = DeviceSubType(3);
    /// Vendor-Defined Device Path.
    pub const HARDWARE_VENDOR: DeviceSubType = DeviceSubType(4);
    /// Controller Device Path.
    pub const HARDWARE_CONTROLLER: DeviceSubType = DeviceSubType(5);
    /// BMC Device Path.
    pub const HARDWARE_BMC: DeviceSubType = DeviceSubType(6);

    /// ACPI Device Path.
    pub const ACPI: DeviceSubType = DeviceSubType(1);
    /// Expanded ACPI Device Path.
    pub const ACPI_EXPANDED: DeviceSubType = DeviceSubType(2);
    /// ACPI _ADR Device Path.
    pub const ACPI_ADR: DeviceSubType = DeviceSubType(3);
    /// NVDIMM Device Path.
    pub const ACPI_NVDIMM: DeviceSubType = DeviceSubType(4);

    /// ATAPI Device Path.
    pub const MESSAGING_ATAPI: DeviceSubType = DeviceSubType(1);
    /// SCSI Device Path.
    pub const MESSAGING_SCSI: DeviceSubType = DeviceSubType(2);
    /// Fibre Channel Device Path.
    pub const MESSAGING_FIBRE_CHANNEL: DeviceSubType = DeviceSubType(3);
    /// 1394 Device Path.
    pub const MESSAGING_1394: DeviceSubType = DeviceSubType(4);
    /// USB Device Path.
    pub const MESSAGING_USB: DeviceSubType = DeviceSubType(5);
    /// I2O Device Path.
    pub const MESSAGING_I2O: DeviceSubType = DeviceSubType(6);
    /// Infiniband Device Path.
    pub const MESSAGING_INFINIBAND: DeviceSubType = DeviceSubType(9);
    /// Vendor-Defined Device Path.
    pub const MESSAGING_VENDOR: DeviceSubType = DeviceSubType(10);
    /// MAC Address Device Path.
    pub const MESSAGING_MAC_ADDRESS: DeviceSubType = DeviceSubType(11);
    /// IPV4 Device Path.
    pub const MESSAGING_IPV4: DeviceSubType = DeviceSubType(12);
    /// IPV6 Device Path.
    pub const MESSAGING_IPV6: DeviceSubType = DeviceSubType(13);
    /// UART Device Path.
    pub const MESSAGING_UART: DeviceSubType = DeviceSubType(14);
    /// USB Class Device Path.
    pub const MESSAGING_USB_CLASS: DeviceSubType = DeviceSubType(15);
    /// USB WWID Device Path.
    pub const MESSAGING_USB_WWID: DeviceSubType = DeviceSubType(16);
    /// Device Logical Unit.
    pub const MESSAGING_DEVICE_LOGICAL_UNIT: DeviceSubType = DeviceSubType(17);
    /// SATA Device Path.
    pub const MESSAGING_SATA: DeviceSubType = DeviceSubType(18);
    /// iSCSI Device Path node (base information).
    pub const MESSAGING_ISCSI: DeviceSubType = DeviceSubType(19);
    /// VLAN Device Path node.
    pub const MESSAGING_VLAN: DeviceSubType = DeviceSubType(20);
    /// Fibre Channel Ex Device Path.
    pub const MESSAGING_FIBRE_CHANNEL_EX: DeviceSubType = DeviceSubType(21);
    /// Serial Attached SCSI (SAS) Ex Device Path.
    pub const MESSAGING_SCSI_SAS_EX: DeviceSubType = DeviceSubType(22);
    /// NVM Express Namespace Device Path.
    pub const MESSAGING_NVME_NAMESPACE: DeviceSubType = DeviceSubType(23);
    /// Uniform Resource Identifiers (URI) Device Path.
    pub const MESSAGING_URI: DeviceSubType = DeviceSubType(24);
    /// UFS Device Path.
    pub const MESSAGING_UFS: DeviceSubType = DeviceSubType(25);
    /// SD (Secure Digital) Device Path.
    pub const MESSAGING_SD: DeviceSubType = DeviceSubType(26);
    /// Bluetooth Device Path.
    pub const MESSAGING_BLUETOOTH: DeviceSubType = DeviceSubType(27);
    /// Wi-Fi Device Path.
    pub const MESSAGING_WIFI: DeviceSubType = DeviceSubType(28);
    /// eMMC (Embedded Multi-Media Card) Device Path.
    pub const MESSAGING_EMMC: DeviceSubType = DeviceSubType(29);
    /// BluetoothLE Device Path.
    pub const MESSAGING_BLUETOOTH_LE: DeviceSubType = DeviceSubType(30);
    /// DNS Device Path.
    pub const MESSAGING_DNS: DeviceSubType = DeviceSubType(31);
    /// NVDIMM Namespace Device Path.
    pub const MESSAGING_NVDIMM_NAMESPACE: DeviceSubType = DeviceSubType(32);

    /// Hard Drive Media Device Path.
    pub const MEDIA_HARD_DRIVE: DeviceSubType = DeviceSubType(1);
    /// CD-ROM Media Device Path.
    pub const MEDIA_CD_ROM: DeviceSubType = DeviceSubType(2);
    /// Vendor-Defined Media Device Path.
    pub const MEDIA_VENDOR: DeviceSubType = DeviceSubType(3);
    /// File Path Media Device Path.
    pub const MEDIA_FILE_PATH: DeviceSubType = DeviceSubType(4);
    /// Media Protocol Device Path.
    pub const MEDIA_PROTOCOL: DeviceSubType = DeviceSubType(5);
    /// PIWG Firmware File.
    pub const MEDIA_PIWG_FIRMWARE_FILE: DeviceSubType = DeviceSubType(6);
    /// PIWG Firmware Volume.
    pub const MEDIA_PIWG_FIRMWARE_VOLUME: DeviceSubType = DeviceSubType(7);
    /// Relative Offset Range.
    pub const MEDIA_RELATIVE_OFFSET_RANGE: DeviceSubType = DeviceSubType(8);
    /// RAM Disk Device Path.
    pub const MEDIA_RAM_DISK: DeviceSubType = DeviceSubType(9);

    /// BIOS Boot Specification Device Path.
    pub const BIOS_BOOT_SPECIFICATION: DeviceSubType = DeviceSubType(1);

    /// End this instance of a Device Path and start a new one.
    pub const END_INSTANCE: DeviceSubType = DeviceSubType(0x01);
    /// End entire Device Path.
    pub const END_ENTIRE: DeviceSubType = DeviceSubType(0xff);
}

/// Largest length a fixed-shape node may claim before the lint rejects it.
/// Only the explicitly variable kinds (vendor data, file names) escape it.
const NODE_LENGTH_LIMIT: u16 = 1024;

/// Defense-in-depth lint over raw, not yet validated path bytes.
///
/// Beyond the framing checks of [`DevicePath::try_from_bytes`], this
/// bounds fixed-shape node lengths to a sane maximum and rejects
/// unrecognized top-level types. `limit` caps how many bytes of `bytes`
/// may be examined; `None` means the whole slice.
#[must_use]
pub fn is_valid(bytes: &[u8], limit: Option<usize>) -> bool {
    let mut remaining = limit.unwrap_or(bytes.len()).min(bytes.len());
    let mut offset = 0;

    loop {
        if remaining < HEADER_SIZE {
            log::warn!("device path truncated before an end node");
            return false;
        }
        let header = match DevicePathHeader::try_from_bytes(&bytes[offset..]) {
            Ok(header) => header,
            Err(_) => {
                log::warn!("invalid device path node header");
                return false;
            }
        };

        let (device_type, sub_type) = (header.device_type, header.sub_type);
        let bounded = match device_type {
            DeviceType::HARDWARE => sub_type != DeviceSubType::HARDWARE_VENDOR,
            DeviceType::ACPI => true,
            DeviceType::MESSAGING => sub_type != DeviceSubType::MESSAGING_VENDOR,
            DeviceType::MEDIA => {
                sub_type != DeviceSubType::MEDIA_VENDOR
                    && sub_type != DeviceSubType::MEDIA_FILE_PATH
            }
            DeviceType::BIOS_BOOT_SPEC => false,
            DeviceType::END => {
                if usize::from(header.length) != HEADER_SIZE {
                    log::warn!("invalid end node");
                    return false;
                }
                false
            }
            _ => {
                log::warn!("invalid device path node type {:#04x}", device_type.0);
                return false;
            }
        };
        if bounded && header.length > NODE_LENGTH_LIMIT {
            log::warn!("invalid {:?} node: length {}", device_type, {
                header.length
            });
            return false;
        }

        if remaining < usize::from(header.length) {
            log::warn!("device path node length overruns buffer");
            return false;
        }
        remaining -= usize::from(header.length);
        offset += usize::from(header.length);

        if (device_type, sub_type) == (DeviceType::END, DeviceSubType::END_ENTIRE) {
            return true;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Append a node to `path` from raw data.
    pub(crate) fn add_node(path: &mut Vec<u8>, device_type: u8, sub_type: u8, node_data: &[u8]) {
        path.push(device_type);
        path.push(sub_type);
        path.extend(
            u16::try_from(HEADER_SIZE + node_data.len())
                .unwrap()
                .to_le_bytes(),
        );
        path.extend(node_data);
    }

    /// Create a two-instance test path as raw bytes.
    fn create_raw_device_path() -> Vec<u8> {
        let mut raw_data = Vec::new();

        // First path instance.
        add_node(&mut raw_data, 0x01, 0xb0, &[10, 11]);
        add_node(&mut raw_data, 0x02, 0xb1, &[20, 21, 22, 23]);
        add_node(
            &mut raw_data,
            DeviceType::END.0,
            DeviceSubType::END_INSTANCE.0,
            &[],
        );
        // Second path instance.
        add_node(&mut raw_data, 0x03, 0xb2, &[30, 31]);
        add_node(&mut raw_data, 0x04, 0xb3, &[40, 41, 42, 43]);
        add_node(
            &mut raw_data,
            DeviceType::END.0,
            DeviceSubType::END_ENTIRE.0,
            &[],
        );

        raw_data
    }

    /// Check that `node` has the expected content.
    fn check_node(node: &DevicePathNode, device_type: u8, sub_type: u8, node_data: &[u8]) {
        assert_eq!(node.device_type().0, device_type);
        assert_eq!(node.sub_type().0, sub_type);
        assert_eq!(
            node.length(),
            u16::try_from(HEADER_SIZE + node_data.len()).unwrap()
        );
        assert_eq!(node.data(), node_data);
    }

    #[test]
    fn test_device_path_nodes() {
        let raw_data = create_raw_device_path();
        let dp = DevicePath::try_from_bytes(&raw_data).unwrap();

        // Check that the size is the sum of the nodes' lengths.
        assert_eq!(dp.size_in_bytes(), 6 + 8 + 4 + 6 + 8 + 4);
        assert_eq!(dp.as_bytes(), &raw_data[..]);

        // Check the list's node iter.
        let nodes: Vec<_> = dp.node_iter().collect();
        check_node(nodes[0], 0x01, 0xb0, &[10, 11]);
        check_node(nodes[1], 0x02, 0xb1, &[20, 21, 22, 23]);
        check_node(
            nodes[2],
            DeviceType::END.0,
            DeviceSubType::END_INSTANCE.0,
            &[],
        );
        check_node(nodes[3], 0x03, 0xb2, &[30, 31]);
        check_node(nodes[4], 0x04, 0xb3, &[40, 41, 42, 43]);
        // The end-entire node is not returned by the iterator.
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn test_device_path_instances() {
        let raw_data = create_raw_device_path();
        let dp = DevicePath::try_from_bytes(&raw_data).unwrap();
        assert!(dp.is_multi_instance());

        // Check the list's instance iter.
        let mut iter = dp.instance_iter();
        let mut instance = iter.next().unwrap();
        assert_eq!(instance.size_in_bytes(), 6 + 8 + 4);

        // Check the first instance's node iter.
        let nodes: Vec<_> = instance.node_iter().collect();
        check_node(nodes[0], 0x01, 0xb0, &[10, 11]);
        check_node(nodes[1], 0x02, 0xb1, &[20, 21, 22, 23]);
        // The end node is not returned by the iterator.
        assert_eq!(nodes.len(), 2);

        // Check second instance.
        instance = iter.next().unwrap();
        assert_eq!(instance.size_in_bytes(), 6 + 8 + 4);

        let nodes: Vec<_> = instance.node_iter().collect();
        check_node(nodes[0], 0x03, 0xb2, &[30, 31]);
        check_node(nodes[1], 0x04, 0xb3, &[40, 41, 42, 43]);
        assert_eq!(nodes.len(), 2);

        // Only two instances.
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_malformed_framing() {
        // Header claims fewer bytes than the header itself.
        let raw = [0x01u8, 0x01, 0x02, 0x00];
        assert_eq!(
            DevicePathNode::try_from_bytes(&raw).unwrap_err(),
            Error::Malformed
        );

        // Node length runs past the end of the buffer.
        let raw = [0x01u8, 0x01, 0x08, 0x00, 0xaa];
        assert_eq!(
            DevicePathNode::try_from_bytes(&raw).unwrap_err(),
            Error::Malformed
        );

        // Truncated header.
        assert_eq!(
            DevicePathNode::try_from_bytes(&[0x7f, 0xff]).unwrap_err(),
            Error::Malformed
        );

        // Missing END_ENTIRE.
        let mut raw = Vec::new();
        add_node(&mut raw, 0x01, 0x01, &[0, 0x1f]);
        assert_eq!(
            DevicePath::try_from_bytes(&raw).unwrap_err(),
            Error::Malformed
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut raw = create_raw_device_path();
        let size = raw.len();
        raw.extend([0xde, 0xad, 0xbe, 0xef]);
        let dp = DevicePath::try_from_bytes(&raw).unwrap();
        assert_eq!(dp.size_in_bytes(), size);
    }

    #[test]
    fn test_is_valid() {
        let raw = create_raw_device_path();
        assert!(is_valid(&raw, None));
        // A limit short of the terminator fails the lint.
        assert!(!is_valid(&raw, Some(raw.len() - 1)));

        // Unknown top-level type.
        let mut raw = Vec::new();
        add_node(&mut raw, 0x09, 0x01, &[]);
        add_node(&mut raw, 0x7f, 0xff, &[]);
        assert!(!is_valid(&raw, None));

        // Oversized fixed-shape node.
        let mut raw = Vec::new();
        add_node(&mut raw, 0x01, 0x01, &[0u8; 1500]);
        add_node(&mut raw, 0x7f, 0xff, &[]);
        assert!(!is_valid(&raw, None));

        // Oversized vendor node is fine.
        let mut raw = Vec::new();
        add_node(&mut raw, 0x01, 0x04, &[0u8; 1500]);
        add_node(&mut raw, 0x7f, 0xff, &[]);
        assert!(is_valid(&raw, None));

        // End node with a bogus length.
        let mut raw = Vec::new();
        add_node(&mut raw, 0x7f, 0xff, &[0]);
        assert!(!is_valid(&raw, None));
    }
}
