// SPDX-License-Identifier: MIT OR Apache-2.0

//! Utilities for creating new device paths.
//!
//! Every node kind is a struct implementing [`BuildNode`], grouped into
//! submodules by class. The size-query idiom of the wire format is split
//! into two explicit operations sharing one size computation:
//! [`BuildNode::size_in_bytes`] reports the exact encoded size, and
//! [`BuildNode::encode_into`] writes the node after checking the buffer
//! against that size.
//!
//! [`DevicePathBuilder`] assembles whole paths; it can be constructed with
//! either a fixed-length buffer or (if the `alloc` feature is enabled) a
//! `Vec`.
//!
//! # Examples
//!
//! ```
//! use efidp::build;
//!
//! # fn main() -> Result<(), efidp::Error> {
//! let mut buf = [0; 256];
//! let path = build::DevicePathBuilder::with_buf(&mut buf)
//!     .push(&build::acpi::Acpi {
//!         hid: 0x0a03_41d0,
//!         uid: 0x0000_0000,
//!     })?
//!     .push(&build::hardware::Pci {
//!         function: 0x00,
//!         device: 0x1f,
//!     })?
//!     .finalize()?;
//!
//! assert_eq!(path.node_iter().count(), 2);
//! # Ok(())
//! # }
//! ```

use crate::path::{DevicePath, DevicePathHeader, DevicePathNode, DeviceSubType, DeviceType};
use crate::{arith, Error, Result};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Trait for types that can be encoded as a device path node.
///
/// This trait is implemented for all the node types in this module's
/// submodules. It is also implemented for [`&DevicePathNode`], which
/// allows an existing node to be copied by the builder.
///
/// [`&DevicePathNode`]: DevicePathNode
pub trait BuildNode {
    /// Size of the node in bytes, including the standard node header.
    ///
    /// This also validates the node's inputs, so a successful size query
    /// guarantees [`write_data`] can encode the node.
    ///
    /// [`write_data`]: Self::write_data
    fn size_in_bytes(&self) -> Result<u16>;

    /// Write out the node data.
    ///
    /// The length of `out` must be equal to the node's [`size_in_bytes`].
    ///
    /// [`size_in_bytes`]: Self::size_in_bytes
    fn write_data(&self, out: &mut [u8]);

    /// Capacity-checked encoding: writes the node to the front of `out`
    /// and returns the number of bytes written.
    ///
    /// Fails with [`Error::InsufficientSpace`] if `out` is smaller than
    /// [`size_in_bytes`]. Query the size first to allocate exactly.
    ///
    /// [`size_in_bytes`]: Self::size_in_bytes
    fn encode_into(&self, out: &mut [u8]) -> Result<usize> {
        let size = usize::from(self.size_in_bytes()?);
        if out.len() < size {
            return Err(Error::InsufficientSpace);
        }
        self.write_data(&mut out[..size]);
        Ok(size)
    }
}

impl BuildNode for &DevicePathNode {
    fn size_in_bytes(&self) -> Result<u16> {
        Ok(self.length())
    }

    fn write_data(&self, out: &mut [u8]) {
        out.copy_from_slice(self.as_bytes());
    }
}

/// Sequential writer for one node. Creating it writes the generic header;
/// the length field is taken from the output slice, which `encode_into`
/// sized from the node's size query.
struct NodeWriter<'a> {
    out: &'a mut [u8],
    offset: usize,
}

impl<'a> NodeWriter<'a> {
    fn new(out: &'a mut [u8], device_type: DeviceType, sub_type: DeviceSubType) -> Self {
        debug_assert!(u16::try_from(out.len()).is_ok());
        DevicePathHeader {
            device_type,
            sub_type,
            length: out.len() as u16,
        }
        .write_to(out);
        Self {
            out,
            offset: crate::path::HEADER_SIZE,
        }
    }

    fn u8(&mut self, value: u8) {
        self.out[self.offset] = value;
        self.offset += 1;
    }

    fn u16_le(&mut self, value: u16) {
        self.bytes(&value.to_le_bytes());
    }

    fn u32_le(&mut self, value: u32) {
        self.bytes(&value.to_le_bytes());
    }

    fn u64_le(&mut self, value: u64) {
        self.bytes(&value.to_le_bytes());
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.out[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    fn guid(&mut self, guid: &uguid::Guid) {
        self.bytes(&guid.to_bytes());
    }

    fn zeros(&mut self, count: usize) {
        self.out[self.offset..self.offset + count].fill(0);
        self.offset += count;
    }
}

/// Number of UCS-2 code units needed for `s`.
///
/// Fails with [`Error::InvalidArgument`] if `s` contains a character
/// outside the basic multilingual plane.
fn ucs2_units(s: &str) -> Result<usize> {
    let mut units = 0;
    ucs2::encode_with(s, |_| {
        units += 1;
        Ok(())
    })
    .map_err(|_| Error::InvalidArgument)?;
    Ok(units)
}

/// Write `s` as UCS-2 code units, without a trailing NUL.
fn write_ucs2(w: &mut NodeWriter, s: &str) {
    // The characters were validated by the node's size query.
    let _ = ucs2::encode_with(s, |unit| {
        w.u16_le(unit);
        Ok(())
    });
}

/// Write a NUL-terminated ASCII string field, validating it first.
fn cstr_size(s: &str) -> Result<usize> {
    if s.bytes().any(|b| b == 0) {
        return Err(Error::InvalidArgument);
    }
    arith::add(s.len(), 1)
}

/// A node of arbitrary type and subtype carrying a verbatim payload.
///
/// The typed structs in the class submodules cover the known node kinds;
/// this is the escape hatch for everything else.
#[derive(Debug)]
pub struct Generic<'a> {
    /// Type of device.
    pub device_type: DeviceType,
    /// Sub type of device.
    pub sub_type: DeviceSubType,
    /// Payload written verbatim after the header.
    pub data: &'a [u8],
}

impl BuildNode for Generic<'_> {
    fn size_in_bytes(&self) -> Result<u16> {
        arith::node_len(self.data.len())
    }

    fn write_data(&self, out: &mut [u8]) {
        let mut w = NodeWriter::new(out, self.device_type, self.sub_type);
        w.bytes(self.data);
    }
}

/// Device path build nodes for [`DeviceType::END`].
pub mod end {
    use super::*;

    /// Node that terminates one instance of a multi-instance path.
    #[derive(Debug)]
    pub struct Instance;

    impl BuildNode for Instance {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(4)
        }

        fn write_data(&self, out: &mut [u8]) {
            NodeWriter::new(out, DeviceType::END, DeviceSubType::END_INSTANCE);
        }
    }

    /// Node that terminates an entire device path.
    #[derive(Debug)]
    pub struct Entire;

    impl BuildNode for Entire {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(4)
        }

        fn write_data(&self, out: &mut [u8]) {
            NodeWriter::new(out, DeviceType::END, DeviceSubType::END_ENTIRE);
        }
    }
}

/// Device path build nodes for [`DeviceType::HARDWARE`].
pub mod hardware {
    use super::*;
    use crate::nodes::{BmcInterfaceType, EDD10_HARDWARE_VENDOR_GUID};
    use uguid::Guid;

    /// PCI hardware device path node.
    #[derive(Debug)]
    pub struct Pci {
        /// PCI function number.
        pub function: u8,
        /// PCI device number.
        pub device: u8,
    }

    impl BuildNode for Pci {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(6)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::HARDWARE, DeviceSubType::HARDWARE_PCI);
            w.u8(self.function);
            w.u8(self.device);
        }
    }

    /// PCCARD hardware device path node.
    #[derive(Debug)]
    pub struct Pccard {
        /// Function number starting from 0.
        pub function: u8,
    }

    impl BuildNode for Pccard {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(5)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::HARDWARE, DeviceSubType::HARDWARE_PCCARD);
            w.u8(self.function);
        }
    }

    /// Memory mapped hardware device path node.
    #[derive(Debug)]
    pub struct MemoryMapped {
        /// EFI memory type code.
        pub memory_type: u32,
        /// Starting memory address.
        pub start_address: u64,
        /// Ending memory address.
        pub end_address: u64,
    }

    impl BuildNode for MemoryMapped {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(24)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::HARDWARE,
                DeviceSubType::HARDWARE_MEMORY_MAPPED,
            );
            w.u32_le(self.memory_type);
            w.u64_le(self.start_address);
            w.u64_le(self.end_address);
        }
    }

    /// Vendor-defined hardware device path node.
    #[derive(Debug)]
    pub struct Vendor<'a> {
        /// Vendor-assigned GUID that defines the data that follows.
        pub vendor_guid: Guid,
        /// Vendor-defined data.
        pub vendor_defined_data: &'a [u8],
    }

    impl BuildNode for Vendor<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            arith::node_len(arith::add(16, self.vendor_defined_data.len())?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::HARDWARE, DeviceSubType::HARDWARE_VENDOR);
            w.guid(&self.vendor_guid);
            w.bytes(self.vendor_defined_data);
        }
    }

    /// EDD 1.0 hardware device path node, a vendor node carrying a legacy
    /// BIOS device number.
    #[derive(Debug)]
    pub struct Edd10 {
        /// EDD 1.0 hardware device number.
        pub hardware_device: u32,
    }

    impl BuildNode for Edd10 {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(24)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::HARDWARE, DeviceSubType::HARDWARE_VENDOR);
            w.guid(&EDD10_HARDWARE_VENDOR_GUID);
            w.u32_le(self.hardware_device);
        }
    }

    /// Controller hardware device path node.
    #[derive(Debug)]
    pub struct Controller {
        /// Controller number.
        pub controller_number: u32,
    }

    impl BuildNode for Controller {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(8)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::HARDWARE,
                DeviceSubType::HARDWARE_CONTROLLER,
            );
            w.u32_le(self.controller_number);
        }
    }

    /// Baseboard Management Controller host interface node.
    #[derive(Debug)]
    pub struct Bmc {
        /// Host interface type.
        pub interface_type: BmcInterfaceType,
        /// Base address of the BMC. If the least-significant bit of the
        /// field is a 1 then the address is in I/O space, otherwise the
        /// address is memory-mapped.
        pub base_address: u64,
    }

    impl BuildNode for Bmc {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(13)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::HARDWARE, DeviceSubType::HARDWARE_BMC);
            w.u8(self.interface_type.0);
            w.u64_le(self.base_address);
        }
    }
}

/// Device path build nodes for [`DeviceType::ACPI`].
pub mod acpi {
    use super::*;

    /// ACPI device path node.
    #[derive(Debug)]
    pub struct Acpi {
        /// Device's PnP hardware ID stored in a numeric 32-bit
        /// compressed EISA-type ID.
        pub hid: u32,
        /// Unique ID that is required by ACPI if two devices have the
        /// same HID.
        pub uid: u32,
    }

    impl BuildNode for Acpi {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(12)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::ACPI, DeviceSubType::ACPI);
            w.u32_le(self.hid);
            w.u32_le(self.uid);
        }
    }

    /// Expanded ACPI device path node.
    ///
    /// The three strings are written back to back, each with a trailing
    /// NUL; an empty string encodes as a lone NUL.
    #[derive(Debug)]
    pub struct Expanded<'a> {
        /// Numeric HID.
        pub hid: u32,
        /// Numeric UID.
        pub uid: u32,
        /// Numeric CID.
        pub cid: u32,
        /// HID string.
        pub hid_str: &'a str,
        /// UID string.
        pub uid_str: &'a str,
        /// CID string.
        pub cid_str: &'a str,
    }

    impl BuildNode for Expanded<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            let mut size = arith::add(12, cstr_size(self.hid_str)?)?;
            size = arith::add(size, cstr_size(self.uid_str)?)?;
            size = arith::add(size, cstr_size(self.cid_str)?)?;
            arith::node_len(size)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::ACPI, DeviceSubType::ACPI_EXPANDED);
            w.u32_le(self.hid);
            w.u32_le(self.uid);
            w.u32_le(self.cid);
            for s in [self.hid_str, self.uid_str, self.cid_str] {
                w.bytes(s.as_bytes());
                w.u8(0);
            }
        }
    }

    /// ACPI `_ADR` device path node.
    #[derive(Debug)]
    pub struct Adr<'a> {
        /// `_ADR` values; at least one is required.
        pub adr: &'a [u32],
    }

    impl BuildNode for Adr<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            if self.adr.is_empty() {
                return Err(Error::InvalidArgument);
            }
            arith::node_len(arith::mul(self.adr.len(), 4)?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::ACPI, DeviceSubType::ACPI_ADR);
            for adr in self.adr {
                w.u32_le(*adr);
            }
        }
    }
}

/// Device path build nodes for [`DeviceType::MESSAGING`].
pub mod messaging {
    use super::*;
    use crate::nodes::{
        Ipv4AddressOrigin, Ipv6AddressOrigin, IscsiLoginOptions, IscsiProtocol, SAS_GUID,
    };
    use uguid::Guid;

    /// ATAPI messaging device path node.
    #[derive(Debug)]
    pub struct Atapi {
        /// 0 for the primary, 1 for the secondary channel.
        pub primary: u8,
        /// 0 for master, 1 for slave.
        pub slave: u8,
        /// Logical unit number.
        pub logical_unit_number: u16,
    }

    impl BuildNode for Atapi {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(8)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_ATAPI);
            w.u8(self.primary);
            w.u8(self.slave);
            w.u16_le(self.logical_unit_number);
        }
    }

    /// SCSI messaging device path node.
    #[derive(Debug)]
    pub struct Scsi {
        /// Target id on the bus.
        pub target_id: u16,
        /// Logical unit number.
        pub logical_unit_number: u16,
    }

    impl BuildNode for Scsi {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(8)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_SCSI);
            w.u16_le(self.target_id);
            w.u16_le(self.logical_unit_number);
        }
    }

    /// Fibre channel ex messaging device path node.
    #[derive(Debug)]
    pub struct FibreChannelEx {
        /// World wide name, in on-wire (big-endian) byte order.
        pub world_wide_name: [u8; 8],
        /// Logical unit number, in on-wire (big-endian) byte order.
        pub logical_unit_number: [u8; 8],
    }

    impl BuildNode for FibreChannelEx {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(24)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_FIBRE_CHANNEL_EX,
            );
            w.zeros(4);
            w.bytes(&self.world_wide_name);
            w.bytes(&self.logical_unit_number);
        }
    }

    /// USB messaging device path node.
    #[derive(Debug)]
    pub struct Usb {
        /// Parent port number.
        pub parent_port_number: u8,
        /// Interface number.
        pub interface: u8,
    }

    impl BuildNode for Usb {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(6)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_USB);
            w.u8(self.parent_port_number);
            w.u8(self.interface);
        }
    }

    /// USB class messaging device path node.
    #[derive(Debug)]
    pub struct UsbClass {
        /// USB vendor id.
        pub vendor_id: u16,
        /// USB product id.
        pub product_id: u16,
        /// Device class.
        pub device_class: u8,
        /// Device subclass.
        pub device_subclass: u8,
        /// Device protocol.
        pub device_protocol: u8,
    }

    impl BuildNode for UsbClass {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(11)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_USB_CLASS,
            );
            w.u16_le(self.vendor_id);
            w.u16_le(self.product_id);
            w.u8(self.device_class);
            w.u8(self.device_subclass);
            w.u8(self.device_protocol);
        }
    }

    /// USB WWID messaging device path node.
    #[derive(Debug)]
    pub struct UsbWwid<'a> {
        /// Interface number.
        pub interface_number: u16,
        /// USB vendor id.
        pub device_vendor_id: u16,
        /// USB product id.
        pub device_product_id: u16,
        /// Serial number; encoded as UCS-2 without a trailing NUL.
        pub serial_number: &'a str,
    }

    impl BuildNode for UsbWwid<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            let serial = arith::mul(ucs2_units(self.serial_number)?, 2)?;
            arith::node_len(arith::add(6, serial)?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_USB_WWID,
            );
            w.u16_le(self.interface_number);
            w.u16_le(self.device_vendor_id);
            w.u16_le(self.device_product_id);
            write_ucs2(&mut w, self.serial_number);
        }
    }

    /// Device logical unit messaging device path node.
    #[derive(Debug)]
    pub struct DeviceLogicalUnit {
        /// Logical unit number.
        pub logical_unit_number: u8,
    }

    impl BuildNode for DeviceLogicalUnit {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(5)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_DEVICE_LOGICAL_UNIT,
            );
            w.u8(self.logical_unit_number);
        }
    }

    /// SATA messaging device path node.
    #[derive(Debug)]
    pub struct Sata {
        /// HBA port; the direct-connect flag may be set.
        pub hba_port_number: u16,
        /// Port multiplier port, or 0xffff for direct attach.
        pub port_multiplier_port_number: u16,
        /// Logical unit number.
        pub logical_unit_number: u16,
    }

    impl BuildNode for Sata {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(10)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_SATA);
            w.u16_le(self.hba_port_number);
            w.u16_le(self.port_multiplier_port_number);
            w.u16_le(self.logical_unit_number);
        }
    }

    /// MAC address messaging device path node.
    #[derive(Debug)]
    pub struct MacAddress<'a> {
        /// The address; padded with zeros, or truncated, to the fixed
        /// 32-byte field.
        pub mac_address: &'a [u8],
        /// RFC 3232 interface type; 1 is Ethernet.
        pub interface_type: u8,
    }

    impl BuildNode for MacAddress<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(37)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_MAC_ADDRESS,
            );
            let len = self.mac_address.len().min(32);
            w.bytes(&self.mac_address[..len]);
            w.zeros(32 - len);
            w.u8(self.interface_type);
        }
    }

    /// IPv4 messaging device path node.
    #[derive(Debug)]
    pub struct Ipv4 {
        /// Local address.
        pub local_ip_address: [u8; 4],
        /// Remote address.
        pub remote_ip_address: [u8; 4],
        /// Local port.
        pub local_port: u16,
        /// Remote port.
        pub remote_port: u16,
        /// IANA protocol number.
        pub protocol: u16,
        /// How the local address was assigned.
        pub ip_address_origin: Ipv4AddressOrigin,
        /// Gateway address.
        pub gateway_ip_address: [u8; 4],
        /// Subnet mask.
        pub subnet_mask: [u8; 4],
    }

    impl BuildNode for Ipv4 {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(27)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_IPV4);
            w.bytes(&self.local_ip_address);
            w.bytes(&self.remote_ip_address);
            w.u16_le(self.local_port);
            w.u16_le(self.remote_port);
            w.u16_le(self.protocol);
            w.u8(self.ip_address_origin.0);
            w.bytes(&self.gateway_ip_address);
            w.bytes(&self.subnet_mask);
        }
    }

    /// IPv6 messaging device path node.
    #[derive(Debug)]
    pub struct Ipv6 {
        /// Local address.
        pub local_ip_address: [u8; 16],
        /// Remote address.
        pub remote_ip_address: [u8; 16],
        /// Local port.
        pub local_port: u16,
        /// Remote port.
        pub remote_port: u16,
        /// IANA protocol number.
        pub protocol: u16,
        /// How the local address was assigned.
        pub ip_address_origin: Ipv6AddressOrigin,
        /// Prefix length of the local address.
        pub prefix_length: u8,
        /// Gateway address.
        pub gateway_ip_address: [u8; 16],
    }

    impl BuildNode for Ipv6 {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(60)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_IPV6);
            w.bytes(&self.local_ip_address);
            w.bytes(&self.remote_ip_address);
            w.u16_le(self.local_port);
            w.u16_le(self.remote_port);
            w.u16_le(self.protocol);
            w.u8(self.ip_address_origin.0);
            w.u8(self.prefix_length);
            w.bytes(&self.gateway_ip_address);
        }
    }

    /// Vendor-defined messaging device path node.
    #[derive(Debug)]
    pub struct Vendor<'a> {
        /// Vendor-assigned GUID that defines the data that follows.
        pub vendor_guid: Guid,
        /// Vendor-defined data.
        pub vendor_defined_data: &'a [u8],
    }

    impl BuildNode for Vendor<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            arith::node_len(arith::add(16, self.vendor_defined_data.len())?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_VENDOR,
            );
            w.guid(&self.vendor_guid);
            w.bytes(self.vendor_defined_data);
        }
    }

    /// SAS messaging device path node: the vendor-defined node carrying a
    /// SAS address, with the topology fields zeroed.
    #[derive(Debug)]
    pub struct Sas {
        /// SAS address.
        pub sas_address: u64,
    }

    impl BuildNode for Sas {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(44)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_VENDOR,
            );
            w.guid(&SAS_GUID);
            w.zeros(4);
            w.u64_le(self.sas_address);
            w.u64_le(0);
            w.zeros(4);
        }
    }

    /// iSCSI messaging device path node.
    #[derive(Debug)]
    pub struct Iscsi<'a> {
        /// Transport protocol.
        pub protocol: IscsiProtocol,
        /// Login options.
        pub options: IscsiLoginOptions,
        /// Logical unit number, in on-wire (big-endian) byte order.
        pub logical_unit_number: [u8; 8],
        /// Target portal group tag.
        pub target_portal_group_tag: u16,
        /// iSCSI target name, including any trailing NUL.
        pub iscsi_target_name: &'a [u8],
    }

    impl BuildNode for Iscsi<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            arith::node_len(arith::add(14, self.iscsi_target_name.len())?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_ISCSI);
            w.u16_le(self.protocol.0);
            w.u16_le(self.options.bits());
            w.bytes(&self.logical_unit_number);
            w.u16_le(self.target_portal_group_tag);
            w.bytes(self.iscsi_target_name);
        }
    }

    /// VLAN messaging device path node.
    #[derive(Debug)]
    pub struct Vlan {
        /// VLAN id.
        pub vlan_id: u16,
    }

    impl BuildNode for Vlan {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(6)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_VLAN);
            w.u16_le(self.vlan_id);
        }
    }

    /// NVMe namespace messaging device path node.
    #[derive(Debug)]
    pub struct NvmeNamespace {
        /// Namespace identifier.
        pub namespace_identifier: u32,
        /// IEEE extended unique identifier; zeroed when absent.
        pub ieee_extended_unique_identifier: Option<[u8; 8]>,
    }

    impl BuildNode for NvmeNamespace {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(16)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_NVME_NAMESPACE,
            );
            w.u32_le(self.namespace_identifier);
            match &self.ieee_extended_unique_identifier {
                Some(eui) => w.bytes(eui),
                None => w.zeros(8),
            }
        }
    }

    /// URI messaging device path node.
    #[derive(Debug)]
    pub struct Uri<'a> {
        /// The URI bytes.
        pub value: &'a [u8],
    }

    impl BuildNode for Uri<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            arith::node_len(self.value.len())
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_URI);
            w.bytes(self.value);
        }
    }

    /// UFS messaging device path node.
    #[derive(Debug)]
    pub struct Ufs {
        /// Target id on the interface.
        pub target_id: u8,
        /// Logical unit number.
        pub logical_unit_number: u8,
    }

    impl BuildNode for Ufs {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(6)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_UFS);
            w.u8(self.target_id);
            w.u8(self.logical_unit_number);
        }
    }

    /// SD card messaging device path node.
    #[derive(Debug)]
    pub struct Sd {
        /// Slot number.
        pub slot_number: u8,
    }

    impl BuildNode for Sd {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(5)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_SD);
            w.u8(self.slot_number);
        }
    }

    /// eMMC messaging device path node.
    #[derive(Debug)]
    pub struct Emmc {
        /// Slot number.
        pub slot_number: u8,
    }

    impl BuildNode for Emmc {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(5)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MESSAGING, DeviceSubType::MESSAGING_EMMC);
            w.u8(self.slot_number);
        }
    }

    /// NVDIMM namespace messaging device path node.
    #[derive(Debug)]
    pub struct NvdimmNamespace {
        /// Namespace UUID.
        pub uuid: Guid,
    }

    impl BuildNode for NvdimmNamespace {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(20)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MESSAGING,
                DeviceSubType::MESSAGING_NVDIMM_NAMESPACE,
            );
            w.guid(&self.uuid);
        }
    }
}

/// Device path build nodes for [`DeviceType::MEDIA`].
pub mod media {
    use super::*;
    use crate::nodes::PartitionFormat;
    use uguid::Guid;

    /// Signature of a hard drive partition; selects the signature type
    /// byte and the content of the fixed 16-byte signature field.
    #[derive(Debug)]
    pub enum PartitionSignature {
        /// No signature; the field is zeroed.
        None,
        /// 32-bit MBR disk serial in the first four signature bytes.
        Mbr(u32),
        /// Full GUID signature.
        Guid(Guid),
        /// Unrecognized signature type with verbatim signature bytes.
        Unknown {
            /// Raw signature type code.
            signature_type: u8,
            /// Raw signature bytes.
            signature: [u8; 16],
        },
    }

    /// Hard drive media device path node.
    #[derive(Debug)]
    pub struct HardDrive {
        /// Partition number, counted from one.
        pub partition_number: u32,
        /// Starting LBA of the partition.
        pub partition_start: u64,
        /// Size of the partition in blocks.
        pub partition_size: u64,
        /// Partition table format.
        pub partition_format: PartitionFormat,
        /// Partition signature.
        pub partition_signature: PartitionSignature,
    }

    impl BuildNode for HardDrive {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(42)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MEDIA, DeviceSubType::MEDIA_HARD_DRIVE);
            w.u32_le(self.partition_number);
            w.u64_le(self.partition_start);
            w.u64_le(self.partition_size);
            match &self.partition_signature {
                PartitionSignature::None => {
                    w.zeros(16);
                    w.u8(self.partition_format.0);
                    w.u8(0x00);
                }
                PartitionSignature::Mbr(serial) => {
                    w.u32_le(*serial);
                    w.zeros(12);
                    w.u8(self.partition_format.0);
                    w.u8(0x01);
                }
                PartitionSignature::Guid(guid) => {
                    w.guid(guid);
                    w.u8(self.partition_format.0);
                    w.u8(0x02);
                }
                PartitionSignature::Unknown {
                    signature_type,
                    signature,
                } => {
                    w.bytes(signature);
                    w.u8(self.partition_format.0);
                    w.u8(*signature_type);
                }
            }
        }
    }

    /// CD-ROM media device path node.
    #[derive(Debug)]
    pub struct CdRom {
        /// Boot catalog entry number.
        pub boot_entry: u32,
        /// Starting RBA of the partition.
        pub partition_start: u64,
        /// Size of the partition in sectors.
        pub partition_size: u64,
    }

    impl BuildNode for CdRom {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(24)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MEDIA, DeviceSubType::MEDIA_CD_ROM);
            w.u32_le(self.boot_entry);
            w.u64_le(self.partition_start);
            w.u64_le(self.partition_size);
        }
    }

    /// Vendor-defined media device path node.
    #[derive(Debug)]
    pub struct Vendor<'a> {
        /// Vendor-assigned GUID that defines the data that follows.
        pub vendor_guid: Guid,
        /// Vendor-defined data.
        pub vendor_defined_data: &'a [u8],
    }

    impl BuildNode for Vendor<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            arith::node_len(arith::add(16, self.vendor_defined_data.len())?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MEDIA, DeviceSubType::MEDIA_VENDOR);
            w.guid(&self.vendor_guid);
            w.bytes(self.vendor_defined_data);
        }
    }

    /// File path media device path node.
    #[derive(Debug)]
    pub struct FilePath<'a> {
        /// The path name; encoded as UCS-2 with a trailing NUL code unit.
        pub path_name: &'a str,
    }

    impl BuildNode for FilePath<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            let units = arith::add(ucs2_units(self.path_name)?, 1)?;
            arith::node_len(arith::mul(units, 2)?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MEDIA, DeviceSubType::MEDIA_FILE_PATH);
            write_ucs2(&mut w, self.path_name);
            w.u16_le(0);
        }
    }

    /// Media protocol device path node.
    #[derive(Debug)]
    pub struct Protocol {
        /// GUID of the protocol.
        pub protocol_guid: Guid,
    }

    impl BuildNode for Protocol {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(20)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MEDIA, DeviceSubType::MEDIA_PROTOCOL);
            w.guid(&self.protocol_guid);
        }
    }

    /// Relative offset range media device path node.
    #[derive(Debug)]
    pub struct RelativeOffsetRange {
        /// Offset of the first byte.
        pub starting_offset: u64,
        /// Offset of the last byte.
        pub ending_offset: u64,
    }

    impl BuildNode for RelativeOffsetRange {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(24)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::MEDIA,
                DeviceSubType::MEDIA_RELATIVE_OFFSET_RANGE,
            );
            w.zeros(4);
            w.u64_le(self.starting_offset);
            w.u64_le(self.ending_offset);
        }
    }

    /// RAM disk media device path node.
    #[derive(Debug)]
    pub struct RamDisk {
        /// Starting memory address.
        pub starting_address: u64,
        /// Ending memory address.
        pub ending_address: u64,
        /// Disk type GUID.
        pub disk_type: Guid,
        /// Disk instance number.
        pub disk_instance: u16,
    }

    impl BuildNode for RamDisk {
        fn size_in_bytes(&self) -> Result<u16> {
            Ok(38)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(out, DeviceType::MEDIA, DeviceSubType::MEDIA_RAM_DISK);
            w.u64_le(self.starting_address);
            w.u64_le(self.ending_address);
            w.guid(&self.disk_type);
            w.u16_le(self.disk_instance);
        }
    }
}

/// Device path build nodes for [`DeviceType::BIOS_BOOT_SPEC`].
pub mod bios_boot_spec {
    use super::*;

    /// BIOS Boot Specification device path node.
    #[derive(Debug)]
    pub struct BiosBootSpec<'a> {
        /// Device type code; 1 floppy, 2 hard disk, 3 CD-ROM, 4 PCMCIA,
        /// 5 USB, 6 embedded network.
        pub device_type: u16,
        /// Status flags.
        pub status_flag: u16,
        /// Description string, including any trailing NUL.
        pub description_string: &'a [u8],
    }

    impl BuildNode for BiosBootSpec<'_> {
        fn size_in_bytes(&self) -> Result<u16> {
            arith::node_len(arith::add(4, self.description_string.len())?)
        }

        fn write_data(&self, out: &mut [u8]) {
            let mut w = NodeWriter::new(
                out,
                DeviceType::BIOS_BOOT_SPEC,
                DeviceSubType::BIOS_BOOT_SPECIFICATION,
            );
            w.u16_le(self.device_type);
            w.u16_le(self.status_flag);
            w.bytes(self.description_string);
        }
    }
}

/// A builder for device paths.
///
/// Nodes are added via the [`push`] method. To complete a path, call the
/// [`finalize`] method; it adds an [`END_ENTIRE`] node and returns a
/// [`DevicePath`] reference tied to the lifetime of the buffer the builder
/// was constructed with.
///
/// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
/// [`finalize`]: DevicePathBuilder::finalize
/// [`push`]: DevicePathBuilder::push
#[derive(Debug)]
pub struct DevicePathBuilder<'a> {
    storage: BuilderStorage<'a>,
}

impl<'a> DevicePathBuilder<'a> {
    /// Create a builder backed by a statically-sized buffer.
    pub fn with_buf(buf: &'a mut [u8]) -> Self {
        Self {
            storage: BuilderStorage::Buf { buf, offset: 0 },
        }
    }

    /// Create a builder backed by a `Vec`.
    #[cfg(feature = "alloc")]
    pub fn with_vec(v: &'a mut Vec<u8>) -> Self {
        Self {
            storage: BuilderStorage::Vec(v),
        }
    }

    /// Add a node to the device path.
    ///
    /// The terminating [`END_ENTIRE`] node should not be pushed; it is
    /// added when [`finalize`] is called.
    ///
    /// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
    /// [`finalize`]: Self::finalize
    pub fn push(mut self, node: &dyn BuildNode) -> Result<Self> {
        match &mut self.storage {
            BuilderStorage::Buf { buf, offset } => {
                *offset += node.encode_into(&mut buf[*offset..])?;
            }
            #[cfg(feature = "alloc")]
            BuilderStorage::Vec(vec) => {
                let node_size = usize::from(node.size_in_bytes()?);
                let old_size = vec.len();
                vec.resize(arith::add(old_size, node_size)?, 0);
                node.write_data(&mut vec[old_size..]);
            }
        }

        Ok(self)
    }

    /// Add an [`END_ENTIRE`] node and return the resulting [`DevicePath`].
    ///
    /// This method consumes the builder.
    ///
    /// [`END_ENTIRE`]: DeviceSubType::END_ENTIRE
    pub fn finalize(self) -> Result<&'a DevicePath> {
        let this = self.push(&end::Entire)?;

        let data: &'a [u8] = match this.storage {
            BuilderStorage::Buf { buf, offset } => {
                let buf: &'a [u8] = buf;
                &buf[..offset]
            }
            #[cfg(feature = "alloc")]
            BuilderStorage::Vec(vec) => vec,
        };

        DevicePath::try_from_bytes(data)
    }
}

#[derive(Debug)]
enum BuilderStorage<'a> {
    Buf {
        buf: &'a mut [u8],
        offset: usize,
    },

    #[cfg(feature = "alloc")]
    Vec(&'a mut Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Ipv4AddressOrigin, IscsiLoginOptions, IscsiProtocol, PartitionFormat};
    use media::PartitionSignature;
    use uguid::guid;

    /// Test that a node's size query, the bytes it writes, and the header
    /// length all agree.
    #[test]
    fn test_size_query_round_trip() {
        let node = hardware::Vendor {
            vendor_guid: guid!("15e39a00-1dd2-1000-8d7f-00a0c92408fc"),
            vendor_defined_data: &[1, 2, 3],
        };
        let size = usize::from(node.size_in_bytes().unwrap());
        assert_eq!(size, 23);

        let mut buf = [0u8; 64];
        assert_eq!(node.encode_into(&mut buf).unwrap(), size);
        let parsed = DevicePathNode::try_from_bytes(&buf).unwrap();
        assert_eq!(usize::from(parsed.length()), size);

        // An exactly-sized buffer works; one byte less does not.
        let mut exact = [0u8; 23];
        assert_eq!(node.encode_into(&mut exact).unwrap(), size);
        assert_eq!(
            node.encode_into(&mut exact[..22]).unwrap_err(),
            Error::InsufficientSpace
        );
    }

    /// Test building an ACPI Expanded node.
    #[test]
    fn test_acpi_expanded() -> Result<()> {
        let mut v = Vec::new();
        let path = DevicePathBuilder::with_vec(&mut v)
            .push(&acpi::Expanded {
                hid: 1,
                uid: 2,
                cid: 3,
                hid_str: "a",
                uid_str: "bc",
                cid_str: "def",
            })?
            .finalize()?;

        #[rustfmt::skip]
        assert_eq!(path.as_bytes(), [
            // ACPI Expanded node
            0x02, 0x02, 0x19, 0x00,
            // HID
            0x01, 0x00, 0x00, 0x00,
            // UID
            0x02, 0x00, 0x00, 0x00,
            // CID
            0x03, 0x00, 0x00, 0x00,

            // HID str
            0x61, 0x00,

            // UID str
            0x62, 0x63, 0x00,

            // CID str
            0x64, 0x65, 0x66, 0x00,

            // End-entire node
            0x7f, 0xff, 0x04, 0x00,
        ]);

        Ok(())
    }

    /// Test that interior NULs in expanded-node strings are rejected.
    #[test]
    fn test_acpi_expanded_rejects_nul() {
        let node = acpi::Expanded {
            hid: 0,
            uid: 0,
            cid: 0,
            hid_str: "a\0b",
            uid_str: "",
            cid_str: "",
        };
        assert_eq!(node.size_in_bytes().unwrap_err(), Error::InvalidArgument);
    }

    /// Test that an empty ADR list is rejected.
    #[test]
    fn test_empty_adr_rejected() {
        let node = acpi::Adr { adr: &[] };
        assert_eq!(node.size_in_bytes().unwrap_err(), Error::InvalidArgument);
    }

    /// Test that packed nodes can be passed into the builder.
    #[test]
    fn test_build_with_packed_node() -> Result<()> {
        // Build a path with both a statically-sized and DST nodes.
        let mut v = Vec::new();
        let path1 = DevicePathBuilder::with_vec(&mut v)
            .push(&acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0x0000_0000,
            })?
            .push(&hardware::Vendor {
                vendor_guid: guid!("15e39a00-1dd2-1000-8d7f-00a0c92408fc"),
                vendor_defined_data: &[1, 2, 3, 4, 5, 6],
            })?
            .finalize()?;

        // Create a second path by copying in the packed nodes from the
        // first path.
        let mut v = Vec::new();
        let mut builder = DevicePathBuilder::with_vec(&mut v);
        for node in path1.node_iter() {
            builder = builder.push(&node)?;
        }
        let path2 = builder.finalize()?;

        // Verify the copied path is identical.
        assert_eq!(path1, path2);

        Ok(())
    }

    /// This test is based on the "Fibre Channel Ex Device Path Example"
    /// from the UEFI Specification.
    #[test]
    fn test_fibre_channel_ex_device_path_example() -> Result<()> {
        // Arbitrarily choose this test to use a statically-sized
        // buffer, just to make sure that code path is tested.
        let mut buf = [0; 256];
        let path = DevicePathBuilder::with_buf(&mut buf)
            .push(&acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0x0000_0000,
            })?
            .push(&hardware::Pci {
                function: 0x00,
                device: 0x1f,
            })?
            .push(&messaging::FibreChannelEx {
                world_wide_name: [0, 1, 2, 3, 4, 5, 6, 7],
                logical_unit_number: [0, 1, 2, 3, 4, 5, 6, 7],
            })?
            .finalize()?;

        #[rustfmt::skip]
        assert_eq!(path.as_bytes(), [
            // ACPI node
            0x02, 0x01, 0x0c, 0x00,
            // HID
            0xd0, 0x41, 0x03, 0x0a,
            // UID
            0x00, 0x00, 0x00, 0x00,

            // PCI node
            0x01, 0x01, 0x06, 0x00,
            // Function
            0x00,
            // Device
            0x1f,

            // Fibre Channel Ex node
            0x03, 0x15,
            // The example in the spec is wrong here; it says 0x14 for
            // the length and leaves out the four-byte reserved field.
            0x18, 0x00,
            // Reserved
            0x00, 0x00, 0x00, 0x00,
            // World wide name
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
            // Logical unit number
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,

            // End-entire node
            0x7f, 0xff, 0x04, 0x00,
        ]);

        Ok(())
    }

    /// This test is based on the "IPv4 configuration" example from the
    /// UEFI Specification.
    #[test]
    fn test_ipv4_configuration_example() -> Result<()> {
        let mut v = Vec::new();
        let path = DevicePathBuilder::with_vec(&mut v)
            .push(&acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0x0000_0000,
            })?
            .push(&hardware::Pci {
                function: 0x00,
                device: 0x19,
            })?
            .push(&messaging::MacAddress {
                mac_address: &[0x00, 0x13, 0x20, 0xf5, 0xfa, 0x77],
                interface_type: 0x01,
            })?
            .push(&messaging::Ipv4 {
                local_ip_address: [192, 168, 0, 1],
                remote_ip_address: [192, 168, 0, 100],
                local_port: 0,
                remote_port: 3260,
                protocol: 6,
                ip_address_origin: Ipv4AddressOrigin::STATIC,
                gateway_ip_address: [0, 0, 0, 0],
                subnet_mask: [0, 0, 0, 0],
            })?
            .push(&messaging::Iscsi {
                protocol: IscsiProtocol::TCP,
                options: IscsiLoginOptions::AUTH_METHOD_NONE,
                logical_unit_number: 0u64.to_le_bytes(),
                target_portal_group_tag: 1,
                iscsi_target_name: b"iqn.1991-05.com.microsoft:iscsitarget-iscsidisk-target\0",
            })?
            .push(&media::HardDrive {
                partition_number: 1,
                partition_start: 0x22,
                partition_size: 0x2710000,
                partition_format: PartitionFormat::GPT,
                partition_signature: PartitionSignature::Guid(guid!(
                    "15e39a00-1dd2-1000-8d7f-00a0c92408fc"
                )),
            })?
            .finalize()?;

        #[rustfmt::skip]
        assert_eq!(path.as_bytes(), [
            // ACPI node
            0x02, 0x01, 0x0c, 0x00,
            // HID
            0xd0, 0x41, 0x03, 0x0a,
            // UID
            0x00, 0x00, 0x00, 0x00,

            // PCI node
            0x01, 0x01, 0x06, 0x00,
            // Function
            0x00,
            // Device
            0x19,

            // MAC address node
            0x03, 0x0b, 0x25, 0x00,
            // MAC address
            0x00, 0x13, 0x20, 0xf5, 0xfa, 0x77, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Network interface type
            0x01,

            // IPv4 node
            0x03, 0x0c, 0x1b, 0x00,
            // Local address
            0xc0, 0xa8, 0x00, 0x01,
            // Remote address
            0xc0, 0xa8, 0x00, 0x64,
            // Local port
            0x00, 0x00,
            // Remote port
            0xbc, 0x0c,
            // Protocol
            0x06, 0x00,
            // Static IP
            0x01,
            // Gateway IP
            0x00, 0x00, 0x00, 0x00,
            // Subnet mask
            0x00, 0x00, 0x00, 0x00,

            // iSCSI node
            0x03, 0x13, 0x49, 0x00,
            // Protocol
            0x00, 0x00,
            // Login options
            0x00, 0x08,
            // LUN
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Target portal group tag
            0x01, 0x00,
            // Node name
            0x69, 0x71, 0x6e, 0x2e, 0x31, 0x39, 0x39, 0x31,
            0x2d, 0x30, 0x35, 0x2e, 0x63, 0x6f, 0x6d, 0x2e,
            0x6d, 0x69, 0x63, 0x72, 0x6f, 0x73, 0x6f, 0x66,
            0x74, 0x3a, 0x69, 0x73, 0x63, 0x73, 0x69, 0x74,
            0x61, 0x72, 0x67, 0x65, 0x74, 0x2d, 0x69, 0x73,
            0x63, 0x73, 0x69, 0x64, 0x69, 0x73, 0x6b, 0x2d,
            0x74, 0x61, 0x72, 0x67, 0x65, 0x74, 0x00,

            // Hard drive node
            0x04, 0x01, 0x2a, 0x00,
            // Partition number
            0x01, 0x00, 0x00, 0x00,
            // Partition start
            0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Partition size
            0x00, 0x00, 0x71, 0x02, 0x00, 0x00, 0x00, 0x00,
            // Partition signature
            0x00, 0x9a, 0xe3, 0x15, 0xd2, 0x1d, 0x00, 0x10,
            0x8d, 0x7f, 0x00, 0xa0, 0xc9, 0x24, 0x08, 0xfc,
            // Partition format
            0x02,
            // Signature type
            0x02,

            // End-entire node
            0x7f, 0xff, 0x04, 0x00,
        ]);

        Ok(())
    }

    /// Test that the file-path node encodes UTF-16 with a trailing NUL.
    #[test]
    fn test_file_path_encoding() -> Result<()> {
        let node = media::FilePath {
            path_name: "\\EFI\\a",
        };
        assert_eq!(node.size_in_bytes()?, 4 + 14);

        let mut buf = [0u8; 18];
        node.encode_into(&mut buf)?;
        #[rustfmt::skip]
        assert_eq!(buf, [
            0x04, 0x04, 0x12, 0x00,
            0x5c, 0x00, 0x45, 0x00, 0x46, 0x00, 0x49, 0x00,
            0x5c, 0x00, 0x61, 0x00, 0x00, 0x00,
        ]);
        Ok(())
    }
}
