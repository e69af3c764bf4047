// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed views of device path nodes.
//!
//! [`DevicePathNode::as_enum`] decodes a node's payload into one of the
//! per-class enums here. All field reads go through a checked reader
//! over the payload slice; a node whose payload is too short for its
//! fixed layout yields [`Error::Malformed`] rather than a view of
//! garbage.
//!
//! Variable-length tails (vendor data, target names, UCS-2 strings) are
//! exposed as byte slices borrowing from the node.

use crate::path::{DevicePathNode, DeviceSubType, DeviceType};
use crate::{Error, Result};
use bitflags::bitflags;
use uguid::{guid, Guid};

/// GUID identifying an EDD 1.0 hardware vendor node.
pub const EDD10_HARDWARE_VENDOR_GUID: Guid = guid!("cf31fac5-c24e-11d2-85f3-00a0c93ec93b");

/// PC-ANSI terminal messaging vendor GUID.
pub const PC_ANSI_GUID: Guid = guid!("e0c14753-f9be-11d2-9a0c-0090273fc14d");
/// VT-100 terminal messaging vendor GUID.
pub const VT_100_GUID: Guid = guid!("dfa66065-b419-11d3-9a2d-0090273fc14d");
/// VT-100+ terminal messaging vendor GUID.
pub const VT_100_PLUS_GUID: Guid = guid!("7baec70b-57e0-4c76-8e87-2f9e28088343");
/// VT-UTF8 terminal messaging vendor GUID.
pub const VT_UTF8_GUID: Guid = guid!("ad15a0d6-8bec-4acf-a073-d01de77e2d88");
/// EFI debug port messaging vendor GUID.
pub const DEBUG_PORT_GUID: Guid = guid!("eba4e8d2-3858-41ec-a281-2647ba9660d0");
/// UART flow control messaging vendor GUID.
pub const UART_FLOW_CONTROL_GUID: Guid = guid!("37499a9d-542f-4c89-a026-35da142094e4");
/// Serial-attached SCSI messaging vendor GUID.
pub const SAS_GUID: Guid = guid!("d487ddb4-008b-11d9-afdc-001083ffca4d");

/// RAM disk type: volatile virtual disk.
pub const VIRTUAL_DISK_GUID: Guid = guid!("77ab535a-45fc-624b-5560-f7b281d1f96e");
/// RAM disk type: volatile virtual CD.
pub const VIRTUAL_CD_GUID: Guid = guid!("3d5abd30-4175-87ce-6d64-d2ade523c4bb");
/// RAM disk type: persistent virtual disk.
pub const PERSISTENT_VIRTUAL_DISK_GUID: Guid = guid!("5cea02c9-4d07-69d3-269f-4496fbe096f9");
/// RAM disk type: persistent virtual CD.
pub const PERSISTENT_VIRTUAL_CD_GUID: Guid = guid!("08018188-42cd-bb48-100f-5387d53ded3d");

/// Compressed EISA-type PnP ID with the PNP vendor prefix, as used in ACPI
/// node HID/CID fields.
#[must_use]
pub const fn eisa_pnp_id(product: u16) -> u32 {
    0x41d0 | ((product as u32) << 16)
}

/// ACPI HID of a PCI root bridge.
pub const PCI_ROOT_HID: u32 = eisa_pnp_id(0x0a03);
/// ACPI HID of a PCIe root bridge.
pub const PCIE_ROOT_HID: u32 = eisa_pnp_id(0x0a08);
/// ACPI HID of a floppy controller.
pub const FLOPPY_HID: u32 = eisa_pnp_id(0x0604);
/// ACPI HID of a keyboard controller.
pub const KEYBOARD_HID: u32 = eisa_pnp_id(0x0301);
/// ACPI HID of a serial port.
pub const SERIAL_HID: u32 = eisa_pnp_id(0x0501);

newtype_enum! {
/// Origin of an IPv4 address in an IPv4 messaging node.
pub enum Ipv4AddressOrigin: u8 => {
    /// Acquired through DHCP.
    DHCP = 0x00,
    /// Statically configured.
    STATIC = 0x01,
}}

newtype_enum! {
/// Origin of an IPv6 address in an IPv6 messaging node.
pub enum Ipv6AddressOrigin: u8 => {
    /// Manually configured.
    MANUAL = 0x00,
    /// Assigned through IPv6 stateless auto-configuration.
    STATELESS_AUTO_CONFIGURATION = 0x01,
    /// Assigned through IPv6 stateful configuration.
    STATEFUL_CONFIGURATION = 0x02,
}}

newtype_enum! {
/// Transport protocol of an iSCSI messaging node.
pub enum IscsiProtocol: u16 => {
    /// TCP.
    TCP = 0x0000,
}}

newtype_enum! {
/// Hard drive partition table format.
pub enum PartitionFormat: u8 => {
    /// Legacy MBR partition table.
    MBR = 0x01,
    /// GUID partition table.
    GPT = 0x02,
}}

newtype_enum! {
/// Baseboard Management Controller host interface type.
pub enum BmcInterfaceType: u8 => {
    /// Unknown.
    UNKNOWN = 0x00,
    /// Keyboard controller style.
    KEYBOARD_CONTROLLER_STYLE = 0x01,
    /// Server management interface chip.
    SERVER_MANAGEMENT_INTERFACE_CHIP = 0x02,
    /// Block transfer.
    BLOCK_TRANSFER = 0x03,
}}

bitflags! {
    /// iSCSI login options.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct IscsiLoginOptions: u16 {
        /// Use CRC32 for the header digest.
        const HEADER_DIGEST_CRC32 = 0x0002;
        /// Use CRC32 for the data digest.
        const DATA_DIGEST_CRC32 = 0x0008;
        /// No authentication.
        const AUTH_METHOD_NONE = 0x0800;
        /// CHAP authentication in unidirectional mode.
        const AUTH_METHOD_CHAP_UNI = 0x1000;
    }
}

bitflags! {
    /// Infiniband resource flags.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct InfinibandResourceFlags: u32 {
        /// The resource is a service; without this flag it is an IOC.
        const SERVICE = 0x0001;
        /// Extended boot environment.
        const EXTENDED_BOOT_ENVIRONMENT = 0x0002;
        /// Console protocol.
        const CONSOLE_PROTOCOL = 0x0004;
        /// Storage protocol.
        const STORAGE_PROTOCOL = 0x0008;
        /// Network protocol.
        const NETWORK_PROTOCOL = 0x0010;
    }
}

/// Checked little-endian reader over a node payload.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.bytes.len() < n {
            return Err(Error::Malformed);
        }
        let (head, rest) = self.bytes.split_at(n);
        self.bytes = rest;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn guid(&mut self) -> Result<Guid> {
        Ok(Guid::from_bytes(self.array()?))
    }

    fn rest(self) -> &'a [u8] {
        self.bytes
    }
}

/// Split a NUL-terminated string off the front of `bytes`. A missing NUL
/// consumes everything.
fn split_cstr(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == 0) {
        Some(nul) => (&bytes[..nul], &bytes[nul + 1..]),
        None => (bytes, &[]),
    }
}

/// Enum of references to all node types.
///
/// Produced by [`DevicePathNode::as_enum`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DevicePathNodeEnum<'a> {
    /// Node for [`DeviceType::HARDWARE`].
    Hardware(HardwareNode<'a>),
    /// Node for [`DeviceType::ACPI`].
    Acpi(AcpiNode<'a>),
    /// Node for [`DeviceType::MESSAGING`].
    Messaging(MessagingNode<'a>),
    /// Node for [`DeviceType::MEDIA`].
    Media(MediaNode<'a>),
    /// Node for [`DeviceType::BIOS_BOOT_SPEC`].
    BiosBoot(BiosBootNode<'a>),
    /// Node for [`DeviceType::END`].
    End(EndNode),
}

impl<'a> TryFrom<&'a DevicePathNode> for DevicePathNodeEnum<'a> {
    type Error = Error;

    fn try_from(node: &'a DevicePathNode) -> Result<Self> {
        Ok(match node.device_type() {
            DeviceType::HARDWARE => Self::Hardware(HardwareNode::parse(node)?),
            DeviceType::ACPI => Self::Acpi(AcpiNode::parse(node)?),
            DeviceType::MESSAGING => Self::Messaging(MessagingNode::parse(node)?),
            DeviceType::MEDIA => Self::Media(MediaNode::parse(node)?),
            DeviceType::BIOS_BOOT_SPEC => Self::BiosBoot(BiosBootNode::parse(node)?),
            DeviceType::END => Self::End(EndNode::parse(node)?),
            _ => return Err(Error::Unsupported),
        })
    }
}

/// Hardware device path node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HardwareNode<'a> {
    /// PCI device.
    Pci {
        /// PCI function number.
        function: u8,
        /// PCI device number.
        device: u8,
    },
    /// PCCARD device.
    Pccard {
        /// Function number starting from 0.
        function: u8,
    },
    /// Memory-mapped device.
    MemoryMapped {
        /// EFI memory type code.
        memory_type: u32,
        /// Starting memory address.
        start_address: u64,
        /// Ending memory address.
        end_address: u64,
    },
    /// Vendor-defined hardware node.
    Vendor {
        /// Vendor-assigned GUID that defines the data that follows.
        vendor_guid: Guid,
        /// Vendor-defined data.
        vendor_defined_data: &'a [u8],
    },
    /// Controller node.
    Controller {
        /// Controller number.
        controller_number: u32,
    },
    /// Baseboard Management Controller host interface.
    Bmc {
        /// Host interface type.
        interface_type: u8,
        /// Base address of the BMC.
        base_address: u64,
    },
    /// Unrecognized hardware subtype.
    Unknown {
        /// Raw subtype code.
        sub_type: u8,
        /// Raw payload.
        data: &'a [u8],
    },
}

impl<'a> HardwareNode<'a> {
    fn parse(node: &'a DevicePathNode) -> Result<Self> {
        let mut r = Reader::new(node.data());
        Ok(match node.sub_type() {
            DeviceSubType::HARDWARE_PCI => Self::Pci {
                function: r.u8()?,
                device: r.u8()?,
            },
            DeviceSubType::HARDWARE_PCCARD => Self::Pccard { function: r.u8()? },
            DeviceSubType::HARDWARE_MEMORY_MAPPED => Self::MemoryMapped {
                memory_type: r.u32_le()?,
                start_address: r.u64_le()?,
                end_address: r.u64_le()?,
            },
            DeviceSubType::HARDWARE_VENDOR => Self::Vendor {
                vendor_guid: r.guid()?,
                vendor_defined_data: r.rest(),
            },
            DeviceSubType::HARDWARE_CONTROLLER => Self::Controller {
                controller_number: r.u32_le()?,
            },
            DeviceSubType::HARDWARE_BMC => Self::Bmc {
                interface_type: r.u8()?,
                base_address: r.u64_le()?,
            },
            sub_type => Self::Unknown {
                sub_type: sub_type.0,
                data: node.data(),
            },
        })
    }
}

/// ACPI device path node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AcpiNode<'a> {
    /// Plain HID/UID node.
    Acpi {
        /// Device's PnP hardware ID stored in a numeric 32-bit
        /// compressed EISA-type ID.
        hid: u32,
        /// Unique ID that is required by ACPI if two devices have the
        /// same HID.
        uid: u32,
    },
    /// Expanded ACPI node carrying string forms of HID/UID/CID.
    Expanded {
        /// Numeric HID.
        hid: u32,
        /// Numeric UID.
        uid: u32,
        /// Numeric CID.
        cid: u32,
        /// HID string; empty when not present.
        hid_str: &'a [u8],
        /// UID string; empty when not present.
        uid_str: &'a [u8],
        /// CID string; empty when not present.
        cid_str: &'a [u8],
    },
    /// `_ADR` node: one or more display addresses.
    Adr {
        /// Raw array of 32-bit `_ADR` values.
        data: &'a [u8],
    },
    /// Unrecognized ACPI subtype.
    Unknown {
        /// Raw subtype code.
        sub_type: u8,
        /// Raw payload.
        data: &'a [u8],
    },
}

impl<'a> AcpiNode<'a> {
    fn parse(node: &'a DevicePathNode) -> Result<Self> {
        let mut r = Reader::new(node.data());
        Ok(match node.sub_type() {
            DeviceSubType::ACPI => Self::Acpi {
                hid: r.u32_le()?,
                uid: r.u32_le()?,
            },
            DeviceSubType::ACPI_EXPANDED => {
                let hid = r.u32_le()?;
                let uid = r.u32_le()?;
                let cid = r.u32_le()?;
                let (hid_str, rest) = split_cstr(r.rest());
                let (uid_str, rest) = split_cstr(rest);
                let (cid_str, _) = split_cstr(rest);
                Self::Expanded {
                    hid,
                    uid,
                    cid,
                    hid_str,
                    uid_str,
                    cid_str,
                }
            }
            DeviceSubType::ACPI_ADR => Self::Adr { data: node.data() },
            sub_type => Self::Unknown {
                sub_type: sub_type.0,
                data: node.data(),
            },
        })
    }
}

/// Messaging device path node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessagingNode<'a> {
    /// ATAPI device.
    Atapi {
        /// 0 for the primary, 1 for the secondary channel.
        primary: u8,
        /// 0 for master, 1 for slave.
        slave: u8,
        /// Logical unit number.
        logical_unit_number: u16,
    },
    /// SCSI device.
    Scsi {
        /// Target id on the bus.
        target_id: u16,
        /// Logical unit number.
        logical_unit_number: u16,
    },
    /// Fibre channel device.
    FibreChannel {
        /// World wide name.
        world_wide_name: u64,
        /// Logical unit number.
        logical_unit_number: u64,
    },
    /// Fibre channel ex device; addresses are big-endian on the wire.
    FibreChannelEx {
        /// World wide name.
        world_wide_name: u64,
        /// Logical unit number.
        logical_unit_number: u64,
    },
    /// 1394 "firewire" device.
    Ieee1394 {
        /// 1394 GUID.
        guid: u64,
    },
    /// USB device addressed by port and interface.
    Usb {
        /// Parent port number.
        parent_port_number: u8,
        /// Interface number.
        interface: u8,
    },
    /// I2O device.
    I2o {
        /// Target id.
        target_id: u32,
    },
    /// Infiniband device.
    Infiniband {
        /// Resource flags; bit 0 selects the IOC/service interpretation
        /// of `ioc_guid_or_service_id`.
        resource_flags: InfinibandResourceFlags,
        /// Port GID, low half first.
        port_gid: [u64; 2],
        /// IOC GUID or service id, selected by the resource flags.
        ioc_guid_or_service_id: u64,
        /// Target port id.
        target_port_id: u64,
        /// Device id.
        device_id: u64,
    },
    /// Vendor-defined messaging node.
    Vendor {
        /// Vendor-assigned GUID that defines the data that follows.
        vendor_guid: Guid,
        /// Vendor-defined data.
        vendor_defined_data: &'a [u8],
    },
    /// Network interface addressed by MAC address.
    MacAddress {
        /// Padded address; only the first six bytes are meaningful for
        /// Ethernet-like interface types.
        mac_address: [u8; 32],
        /// RFC 3232 interface type; 1 is Ethernet.
        interface_type: u8,
    },
    /// IPv4 endpoint.
    Ipv4 {
        /// Local address.
        local_ip_address: [u8; 4],
        /// Remote address.
        remote_ip_address: [u8; 4],
        /// Local port.
        local_port: u16,
        /// Remote port.
        remote_port: u16,
        /// IANA protocol number.
        protocol: u16,
        /// How the local address was assigned.
        ip_address_origin: Ipv4AddressOrigin,
        /// Gateway address.
        gateway_ip_address: [u8; 4],
        /// Subnet mask.
        subnet_mask: [u8; 4],
    },
    /// IPv6 endpoint.
    Ipv6 {
        /// Local address.
        local_ip_address: [u8; 16],
        /// Remote address.
        remote_ip_address: [u8; 16],
        /// Local port.
        local_port: u16,
        /// Remote port.
        remote_port: u16,
        /// IANA protocol number.
        protocol: u16,
        /// How the local address was assigned.
        ip_address_origin: Ipv6AddressOrigin,
    },
    /// UART endpoint.
    Uart {
        /// Baud rate; 0 means the device default (rendered as 115200).
        baud_rate: u64,
        /// Data bits; 0 means the device default (rendered as 8).
        data_bits: u8,
        /// Parity code.
        parity: u8,
        /// Stop bits code.
        stop_bits: u8,
    },
    /// USB device addressed by class.
    UsbClass {
        /// USB vendor id.
        vendor_id: u16,
        /// USB product id.
        product_id: u16,
        /// Device class.
        device_class: u8,
        /// Device subclass.
        device_subclass: u8,
        /// Device protocol.
        device_protocol: u8,
    },
    /// USB device addressed by its serial number.
    UsbWwid {
        /// Interface number.
        interface_number: u16,
        /// USB vendor id.
        device_vendor_id: u16,
        /// USB product id.
        device_product_id: u16,
        /// Serial number, UCS-2 encoded.
        serial_number: &'a [u8],
    },
    /// Logical unit on the parent device.
    DeviceLogicalUnit {
        /// Logical unit number.
        logical_unit_number: u8,
    },
    /// SATA device.
    Sata {
        /// HBA port; the direct-connect flag may be set.
        hba_port_number: u16,
        /// Port multiplier port, or 0xffff for direct attach.
        port_multiplier_port_number: u16,
        /// Logical unit number.
        logical_unit_number: u16,
    },
    /// iSCSI target.
    Iscsi {
        /// Transport protocol.
        protocol: IscsiProtocol,
        /// Login options.
        options: IscsiLoginOptions,
        /// Logical unit number, big-endian on the wire.
        logical_unit_number: [u8; 8],
        /// Target portal group tag.
        target_portal_group_tag: u16,
        /// iSCSI target name.
        iscsi_target_name: &'a [u8],
    },
    /// VLAN tag.
    Vlan {
        /// VLAN id.
        vlan_id: u16,
    },
    /// SAS ex device; addresses are big-endian on the wire.
    SasEx {
        /// SAS address.
        sas_address: u64,
        /// Logical unit number.
        logical_unit_number: u64,
        /// Topology information byte.
        device_topology_info: u8,
        /// Drive bay id, meaningful when the topology byte says so.
        drive_bay_id: u8,
        /// Relative target port.
        rtp: u16,
    },
    /// NVMe namespace.
    NvmeNamespace {
        /// Namespace identifier.
        namespace_identifier: u32,
        /// IEEE extended unique identifier.
        ieee_extended_unique_identifier: [u8; 8],
    },
    /// Uniform resource identifier.
    Uri {
        /// The URI bytes.
        value: &'a [u8],
    },
    /// UFS device.
    Ufs {
        /// Target id on the interface.
        target_id: u8,
        /// Logical unit number.
        logical_unit_number: u8,
    },
    /// SD card.
    Sd {
        /// Slot number.
        slot_number: u8,
    },
    /// Bluetooth device.
    Bluetooth {
        /// 48-bit device address.
        device_address: [u8; 6],
    },
    /// Wi-Fi network.
    Wifi {
        /// SSID, NUL padded.
        ssid: [u8; 32],
    },
    /// eMMC device.
    Emmc {
        /// Slot number.
        slot_number: u8,
    },
    /// Bluetooth LE device.
    BluetoothLe {
        /// 48-bit device address.
        device_address: [u8; 6],
        /// 0 for a public, 1 for a random address.
        address_type: u8,
    },
    /// DNS server list.
    Dns {
        /// Nonzero when the addresses are IPv6.
        is_ipv6: u8,
        /// Concatenated 16-byte address records.
        addresses: &'a [u8],
    },
    /// NVDIMM namespace.
    NvdimmNamespace {
        /// Namespace UUID.
        uuid: Guid,
    },
    /// Unrecognized messaging subtype.
    Unknown {
        /// Raw subtype code.
        sub_type: u8,
        /// Raw payload.
        data: &'a [u8],
    },
}

impl<'a> MessagingNode<'a> {
    fn parse(node: &'a DevicePathNode) -> Result<Self> {
        let mut r = Reader::new(node.data());
        Ok(match node.sub_type() {
            DeviceSubType::MESSAGING_ATAPI => Self::Atapi {
                primary: r.u8()?,
                slave: r.u8()?,
                logical_unit_number: r.u16_le()?,
            },
            DeviceSubType::MESSAGING_SCSI => Self::Scsi {
                target_id: r.u16_le()?,
                logical_unit_number: r.u16_le()?,
            },
            DeviceSubType::MESSAGING_FIBRE_CHANNEL => {
                let _reserved = r.u32_le()?;
                Self::FibreChannel {
                    world_wide_name: r.u64_le()?,
                    logical_unit_number: r.u64_le()?,
                }
            }
            DeviceSubType::MESSAGING_FIBRE_CHANNEL_EX => {
                let _reserved = r.u32_le()?;
                Self::FibreChannelEx {
                    world_wide_name: r.u64_be()?,
                    logical_unit_number: r.u64_be()?,
                }
            }
            DeviceSubType::MESSAGING_1394 => {
                let _reserved = r.u32_le()?;
                Self::Ieee1394 { guid: r.u64_le()? }
            }
            DeviceSubType::MESSAGING_USB => Self::Usb {
                parent_port_number: r.u8()?,
                interface: r.u8()?,
            },
            DeviceSubType::MESSAGING_I2O => Self::I2o {
                target_id: r.u32_le()?,
            },
            DeviceSubType::MESSAGING_INFINIBAND => Self::Infiniband {
                resource_flags: InfinibandResourceFlags::from_bits_retain(r.u32_le()?),
                port_gid: [r.u64_le()?, r.u64_le()?],
                ioc_guid_or_service_id: r.u64_le()?,
                target_port_id: r.u64_le()?,
                device_id: r.u64_le()?,
            },
            DeviceSubType::MESSAGING_VENDOR => Self::Vendor {
                vendor_guid: r.guid()?,
                vendor_defined_data: r.rest(),
            },
            DeviceSubType::MESSAGING_MAC_ADDRESS => Self::MacAddress {
                mac_address: r.array()?,
                interface_type: r.u8()?,
            },
            DeviceSubType::MESSAGING_IPV4 => Self::Ipv4 {
                local_ip_address: r.array()?,
                remote_ip_address: r.array()?,
                local_port: r.u16_le()?,
                remote_port: r.u16_le()?,
                protocol: r.u16_le()?,
                ip_address_origin: Ipv4AddressOrigin(r.u8()?),
                gateway_ip_address: r.array()?,
                subnet_mask: r.array()?,
            },
            DeviceSubType::MESSAGING_IPV6 => Self::Ipv6 {
                local_ip_address: r.array()?,
                remote_ip_address: r.array()?,
                local_port: r.u16_le()?,
                remote_port: r.u16_le()?,
                protocol: r.u16_le()?,
                ip_address_origin: Ipv6AddressOrigin(r.u8()?),
            },
            DeviceSubType::MESSAGING_UART => {
                let _reserved = r.u32_le()?;
                Self::Uart {
                    baud_rate: r.u64_le()?,
                    data_bits: r.u8()?,
                    parity: r.u8()?,
                    stop_bits: r.u8()?,
                }
            }
            DeviceSubType::MESSAGING_USB_CLASS => Self::UsbClass {
                vendor_id: r.u16_le()?,
                product_id: r.u16_le()?,
                device_class: r.u8()?,
                device_subclass: r.u8()?,
                device_protocol: r.u8()?,
            },
            DeviceSubType::MESSAGING_USB_WWID => Self::UsbWwid {
                interface_number: r.u16_le()?,
                device_vendor_id: r.u16_le()?,
                device_product_id: r.u16_le()?,
                serial_number: r.rest(),
            },
            DeviceSubType::MESSAGING_DEVICE_LOGICAL_UNIT => Self::DeviceLogicalUnit {
                logical_unit_number: r.u8()?,
            },
            DeviceSubType::MESSAGING_SATA => Self::Sata {
                hba_port_number: r.u16_le()?,
                port_multiplier_port_number: r.u16_le()?,
                logical_unit_number: r.u16_le()?,
            },
            DeviceSubType::MESSAGING_ISCSI => Self::Iscsi {
                protocol: IscsiProtocol(r.u16_le()?),
                options: IscsiLoginOptions::from_bits_retain(r.u16_le()?),
                logical_unit_number: r.array()?,
                target_portal_group_tag: r.u16_le()?,
                iscsi_target_name: r.rest(),
            },
            DeviceSubType::MESSAGING_VLAN => Self::Vlan {
                vlan_id: r.u16_le()?,
            },
            DeviceSubType::MESSAGING_SCSI_SAS_EX => Self::SasEx {
                sas_address: r.u64_be()?,
                logical_unit_number: r.u64_be()?,
                device_topology_info: r.u8()?,
                drive_bay_id: r.u8()?,
                rtp: r.u16_le()?,
            },
            DeviceSubType::MESSAGING_NVME_NAMESPACE => Self::NvmeNamespace {
                namespace_identifier: r.u32_le()?,
                ieee_extended_unique_identifier: r.array()?,
            },
            DeviceSubType::MESSAGING_URI => Self::Uri { value: r.rest() },
            DeviceSubType::MESSAGING_UFS => Self::Ufs {
                target_id: r.u8()?,
                logical_unit_number: r.u8()?,
            },
            DeviceSubType::MESSAGING_SD => Self::Sd {
                slot_number: r.u8()?,
            },
            DeviceSubType::MESSAGING_BLUETOOTH => Self::Bluetooth {
                device_address: r.array()?,
            },
            DeviceSubType::MESSAGING_WIFI => Self::Wifi { ssid: r.array()? },
            DeviceSubType::MESSAGING_EMMC => Self::Emmc {
                slot_number: r.u8()?,
            },
            DeviceSubType::MESSAGING_BLUETOOTH_LE => Self::BluetoothLe {
                device_address: r.array()?,
                address_type: r.u8()?,
            },
            DeviceSubType::MESSAGING_DNS => Self::Dns {
                is_ipv6: r.u8()?,
                addresses: r.rest(),
            },
            DeviceSubType::MESSAGING_NVDIMM_NAMESPACE => Self::NvdimmNamespace { uuid: r.guid()? },
            sub_type => Self::Unknown {
                sub_type: sub_type.0,
                data: node.data(),
            },
        })
    }
}

/// Media device path node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MediaNode<'a> {
    /// Partition on a hard disk.
    HardDrive {
        /// Partition number, counted from one.
        partition_number: u32,
        /// Starting LBA of the partition.
        partition_start: u64,
        /// Size of the partition in blocks.
        partition_size: u64,
        /// Signature bytes; interpretation is selected by
        /// `signature_type` alone.
        partition_signature: [u8; 16],
        /// Partition table format.
        partition_format: u8,
        /// 0 none, 1 MBR serial in the first four signature bytes,
        /// 2 full GUID signature.
        signature_type: u8,
    },
    /// El Torito boot entry on a CD-ROM.
    CdRom {
        /// Boot catalog entry number.
        boot_entry: u32,
        /// Starting RBA of the partition.
        partition_start: u64,
        /// Size of the partition in sectors.
        partition_size: u64,
    },
    /// Vendor-defined media node.
    Vendor {
        /// Vendor-assigned GUID that defines the data that follows.
        vendor_guid: Guid,
        /// Vendor-defined data.
        vendor_defined_data: &'a [u8],
    },
    /// File path, UCS-2 encoded with a trailing NUL.
    FilePath {
        /// Raw UCS-2 bytes of the path name.
        path_name: &'a [u8],
    },
    /// Media protocol.
    Protocol {
        /// GUID of the protocol.
        protocol_guid: Guid,
    },
    /// PIWG firmware file.
    PiwgFirmwareFile {
        /// GUID naming the firmware file.
        fv_file_name: Guid,
    },
    /// PIWG firmware volume.
    PiwgFirmwareVolume {
        /// GUID naming the firmware volume.
        fv_name: Guid,
    },
    /// Byte range relative to the parent device.
    RelativeOffsetRange {
        /// Offset of the first byte.
        starting_offset: u64,
        /// Offset of the last byte.
        ending_offset: u64,
    },
    /// RAM disk.
    RamDisk {
        /// Starting memory address.
        starting_address: u64,
        /// Ending memory address.
        ending_address: u64,
        /// Disk type GUID.
        disk_type: Guid,
        /// Disk instance number.
        disk_instance: u16,
    },
    /// Unrecognized media subtype.
    Unknown {
        /// Raw subtype code.
        sub_type: u8,
        /// Raw payload.
        data: &'a [u8],
    },
}

impl<'a> MediaNode<'a> {
    fn parse(node: &'a DevicePathNode) -> Result<Self> {
        let mut r = Reader::new(node.data());
        Ok(match node.sub_type() {
            DeviceSubType::MEDIA_HARD_DRIVE => Self::HardDrive {
                partition_number: r.u32_le()?,
                partition_start: r.u64_le()?,
                partition_size: r.u64_le()?,
                partition_signature: r.array()?,
                partition_format: r.u8()?,
                signature_type: r.u8()?,
            },
            DeviceSubType::MEDIA_CD_ROM => Self::CdRom {
                boot_entry: r.u32_le()?,
                partition_start: r.u64_le()?,
                partition_size: r.u64_le()?,
            },
            DeviceSubType::MEDIA_VENDOR => Self::Vendor {
                vendor_guid: r.guid()?,
                vendor_defined_data: r.rest(),
            },
            DeviceSubType::MEDIA_FILE_PATH => Self::FilePath {
                path_name: node.data(),
            },
            DeviceSubType::MEDIA_PROTOCOL => Self::Protocol {
                protocol_guid: r.guid()?,
            },
            DeviceSubType::MEDIA_PIWG_FIRMWARE_FILE => Self::PiwgFirmwareFile {
                fv_file_name: r.guid()?,
            },
            DeviceSubType::MEDIA_PIWG_FIRMWARE_VOLUME => Self::PiwgFirmwareVolume {
                fv_name: r.guid()?,
            },
            DeviceSubType::MEDIA_RELATIVE_OFFSET_RANGE => {
                let _reserved = r.u32_le()?;
                Self::RelativeOffsetRange {
                    starting_offset: r.u64_le()?,
                    ending_offset: r.u64_le()?,
                }
            }
            DeviceSubType::MEDIA_RAM_DISK => Self::RamDisk {
                starting_address: r.u64_le()?,
                ending_address: r.u64_le()?,
                disk_type: r.guid()?,
                disk_instance: r.u16_le()?,
            },
            sub_type => Self::Unknown {
                sub_type: sub_type.0,
                data: node.data(),
            },
        })
    }
}

/// BIOS Boot Specification device path node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BiosBootNode<'a> {
    /// BIOS boot specification version 1.01 entry.
    Bbs {
        /// Device type code; 1 floppy, 2 hard disk, 3 CD-ROM, 4 PCMCIA,
        /// 5 USB, 6 embedded network.
        device_type: u16,
        /// Status flags.
        status_flag: u16,
        /// NUL-terminated description string.
        description: &'a [u8],
    },
    /// Unrecognized BIOS boot subtype.
    Unknown {
        /// Raw subtype code.
        sub_type: u8,
        /// Raw payload.
        data: &'a [u8],
    },
}

impl<'a> BiosBootNode<'a> {
    fn parse(node: &'a DevicePathNode) -> Result<Self> {
        let mut r = Reader::new(node.data());
        Ok(match node.sub_type() {
            DeviceSubType::BIOS_BOOT_SPECIFICATION => Self::Bbs {
                device_type: r.u16_le()?,
                status_flag: r.u16_le()?,
                description: r.rest(),
            },
            sub_type => Self::Unknown {
                sub_type: sub_type.0,
                data: node.data(),
            },
        })
    }
}

/// End-of-path marker node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndNode {
    /// Terminates one instance; another follows.
    Instance,
    /// Terminates the entire device path.
    Entire,
}

impl EndNode {
    fn parse(node: &DevicePathNode) -> Result<Self> {
        match node.sub_type() {
            DeviceSubType::END_INSTANCE => Ok(Self::Instance),
            DeviceSubType::END_ENTIRE => Ok(Self::Entire),
            _ => Err(Error::Unsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn node_bytes(device_type: u8, sub_type: u8, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.push(device_type);
        bytes.push(sub_type);
        bytes.extend(u16::try_from(4 + payload.len()).unwrap().to_le_bytes());
        bytes.extend(payload);
        bytes
    }

    fn parse(bytes: &[u8]) -> DevicePathNodeEnum {
        DevicePathNode::try_from_bytes(bytes)
            .unwrap()
            .as_enum()
            .unwrap()
    }

    #[test]
    fn test_parse_pci() {
        let bytes = node_bytes(0x01, 0x01, &[0x00, 0x1f]);
        assert_eq!(
            parse(&bytes),
            DevicePathNodeEnum::Hardware(HardwareNode::Pci {
                function: 0x00,
                device: 0x1f,
            })
        );
    }

    #[test]
    fn test_parse_vendor() {
        let mut payload = [0u8; 20];
        payload[..16].copy_from_slice(&PC_ANSI_GUID.to_bytes());
        payload[16..].copy_from_slice(&[1, 2, 3, 4]);
        let bytes = node_bytes(0x03, 0x0a, &payload);
        assert_eq!(
            parse(&bytes),
            DevicePathNodeEnum::Messaging(MessagingNode::Vendor {
                vendor_guid: PC_ANSI_GUID,
                vendor_defined_data: &[1, 2, 3, 4],
            })
        );
    }

    #[test]
    fn test_parse_acpi_expanded() {
        let mut payload = Vec::new();
        payload.extend(1u32.to_le_bytes());
        payload.extend(2u32.to_le_bytes());
        payload.extend(3u32.to_le_bytes());
        payload.extend(b"a\0bc\0def\0");
        let bytes = node_bytes(0x02, 0x02, &payload);
        assert_eq!(
            parse(&bytes),
            DevicePathNodeEnum::Acpi(AcpiNode::Expanded {
                hid: 1,
                uid: 2,
                cid: 3,
                hid_str: b"a",
                uid_str: b"bc",
                cid_str: b"def",
            })
        );
    }

    #[test]
    fn test_parse_fibre_channel_ex_is_big_endian() {
        let mut payload = Vec::new();
        payload.extend(0u32.to_le_bytes());
        payload.extend([0, 1, 2, 3, 4, 5, 6, 7]);
        payload.extend([0u8; 8]);
        let bytes = node_bytes(0x03, 0x15, &payload);
        assert_eq!(
            parse(&bytes),
            DevicePathNodeEnum::Messaging(MessagingNode::FibreChannelEx {
                world_wide_name: 0x0001_0203_0405_0607,
                logical_unit_number: 0,
            })
        );
    }

    #[test]
    fn test_parse_short_payload_is_malformed() {
        // PCI with a one-byte payload.
        let bytes = node_bytes(0x01, 0x01, &[0x00]);
        let node = DevicePathNode::try_from_bytes(&bytes).unwrap();
        assert_eq!(node.as_enum().unwrap_err(), Error::Malformed);
    }

    #[test]
    fn test_parse_unknown_subtype() {
        let bytes = node_bytes(0x04, 0x77, &[0xab]);
        assert_eq!(
            parse(&bytes),
            DevicePathNodeEnum::Media(MediaNode::Unknown {
                sub_type: 0x77,
                data: &[0xab],
            })
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let bytes = node_bytes(0x60, 0x01, &[]);
        let node = DevicePathNode::try_from_bytes(&bytes).unwrap();
        assert_eq!(node.as_enum().unwrap_err(), Error::Unsupported);
    }
}
