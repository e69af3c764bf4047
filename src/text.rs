// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textual rendering of device paths.
//!
//! Each node renders to its EDK2-compatible form, nodes are joined with
//! `/`, and alternate instances of a multi-instance path are joined with
//! `,`. Unrecognized but well-framed nodes never fail the render; they
//! degrade to a hex dump of their payload.
//!
//! [`DevicePath`] and [`DevicePathNode`] implement [`Display`]. For
//! callers that format into a caller-provided buffer, the size-query
//! idiom is available as two explicit operations sharing one renderer:
//! [`formatted_size`] reports the exact byte length and
//! [`format_device_path`] writes it.
//!
//! Parsing the text form back into bytes is intentionally not
//! implemented; [`parse_device_path`] and [`parse_device_node`] exist
//! only to report that.
//!
//! [`Display`]: core::fmt::Display

use crate::nodes::{
    AcpiNode, BiosBootNode, DevicePathNodeEnum, HardwareNode, IscsiLoginOptions, IscsiProtocol,
    MediaNode, MessagingNode, DEBUG_PORT_GUID, EDD10_HARDWARE_VENDOR_GUID, FLOPPY_HID,
    KEYBOARD_HID, PCIE_ROOT_HID, PCI_ROOT_HID, PC_ANSI_GUID, PERSISTENT_VIRTUAL_CD_GUID,
    PERSISTENT_VIRTUAL_DISK_GUID, SAS_GUID, SERIAL_HID, UART_FLOW_CONTROL_GUID, VIRTUAL_CD_GUID,
    VIRTUAL_DISK_GUID, VT_100_GUID, VT_100_PLUS_GUID, VT_UTF8_GUID,
};
use crate::path::{DevicePath, DevicePathNode};
use crate::{Error, Result};
use core::fmt::{self, Write};
use uguid::Guid;

/// Longest iSCSI target name the renderer will print.
const ISCSI_MAX_TARGET_NAME_LEN: usize = 223;

/// Byte length of the textual form of `path`.
///
/// This is the size-query half of [`format_device_path`]: a buffer of
/// exactly this many bytes is guaranteed to fit the rendered path.
pub fn formatted_size(path: &DevicePath, limit: Option<usize>) -> Result<usize> {
    let mut w = CountingWriter { len: 0 };
    render_path(&mut w, path, limit)?;
    Ok(w.len)
}

/// Render `path` into `buf` and return the number of bytes written.
///
/// `limit` optionally caps how many bytes of the input path are
/// consumed; rendering stops early once the next node would exceed it.
/// Fails with [`Error::InsufficientSpace`] if `buf` is smaller than
/// [`formatted_size`] reports, and with [`Error::Malformed`] if a limit
/// cuts off the path before anything could be rendered.
pub fn format_device_path(buf: &mut [u8], path: &DevicePath, limit: Option<usize>) -> Result<usize> {
    let mut w = SliceWriter { buf, len: 0 };
    render_path(&mut w, path, limit)?;
    Ok(w.len)
}

/// Parse the textual form of a device path. Not implemented; always
/// fails with [`Error::Unsupported`].
pub fn parse_device_path(_text: &str, _out: &mut [u8]) -> Result<usize> {
    Err(Error::Unsupported)
}

/// Parse the textual form of a single device path node. Not implemented;
/// always fails with [`Error::Unsupported`].
pub fn parse_device_node(_text: &str, _out: &mut [u8]) -> Result<usize> {
    Err(Error::Unsupported)
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render_path(f, self, None).map_err(|_| fmt::Error)
    }
}

impl fmt::Display for DevicePathNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render_node(f, self).map_err(|_| fmt::Error)
    }
}

struct CountingWriter {
    len: usize,
}

impl Write for CountingWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.len += s.len();
        Ok(())
    }
}

struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.len.checked_add(bytes.len()).ok_or(fmt::Error)?;
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

fn render_path<W: Write>(w: &mut W, path: &DevicePath, limit: Option<usize>) -> Result<()> {
    let mut remaining = limit;
    let mut first = true;
    let mut rendered = false;

    for node in path.node_iter() {
        if let Some(rem) = &mut remaining {
            let node_size = usize::from(node.length());
            if *rem < node_size {
                return if rendered { Ok(()) } else { Err(Error::Malformed) };
            }
            *rem -= node_size;
        }

        if node.is_end_instance() {
            w.write_char(',')?;
            first = true;
            rendered = true;
            continue;
        }

        if !first {
            w.write_char('/')?;
        }
        first = false;
        render_node(w, node)?;
        rendered = true;
    }
    Ok(())
}

fn render_node<W: Write>(w: &mut W, node: &DevicePathNode) -> Result<()> {
    match node.as_enum() {
        Ok(DevicePathNodeEnum::Hardware(hw)) => render_hardware(w, hw),
        Ok(DevicePathNodeEnum::Acpi(acpi)) => render_acpi(w, acpi),
        Ok(DevicePathNodeEnum::Messaging(msg)) => render_messaging(w, msg),
        Ok(DevicePathNodeEnum::Media(media)) => render_media(w, media),
        Ok(DevicePathNodeEnum::BiosBoot(bbs)) => render_bios_boot(w, bbs),
        Ok(DevicePathNodeEnum::End(_)) => Ok(()),
        Err(_) => {
            // Unknown type or a payload too short for its fixed layout:
            // degrade to a hex dump rather than failing the render.
            write!(w, "Path({},{},", node.device_type().0, node.sub_type().0)?;
            hex(w, node.data())?;
            w.write_char(')')?;
            Ok(())
        }
    }
}

fn render_hardware<W: Write>(w: &mut W, node: HardwareNode) -> Result<()> {
    match node {
        HardwareNode::Pci { function, device } => {
            write!(w, "Pci({device:#x},{function:#x})")?;
        }
        HardwareNode::Pccard { function } => write!(w, "PcCard({function:#x})")?,
        HardwareNode::MemoryMapped {
            memory_type,
            start_address,
            end_address,
        } => {
            write!(
                w,
                "MemoryMapped({memory_type},{start_address:#x},{end_address:#x})"
            )?;
        }
        HardwareNode::Vendor {
            vendor_guid,
            vendor_defined_data,
        } => {
            if vendor_guid == EDD10_HARDWARE_VENDOR_GUID && vendor_defined_data.len() >= 4 {
                let device = u32::from_le_bytes([
                    vendor_defined_data[0],
                    vendor_defined_data[1],
                    vendor_defined_data[2],
                    vendor_defined_data[3],
                ]);
                write!(w, "EDD10({device:#x})")?;
            } else {
                vendor(w, "VenHw", vendor_guid, vendor_defined_data)?;
            }
        }
        HardwareNode::Controller { controller_number } => {
            write!(w, "Ctrl({controller_number:#x})")?;
        }
        HardwareNode::Bmc {
            interface_type,
            base_address,
        } => write!(w, "BMC({interface_type},{base_address:#x})")?,
        HardwareNode::Unknown { sub_type, data } => {
            write!(w, "HardwarePath({sub_type},")?;
            hex(w, data)?;
            w.write_char(')')?;
        }
    }
    Ok(())
}

fn render_acpi<W: Write>(w: &mut W, node: AcpiNode) -> Result<()> {
    match node {
        AcpiNode::Acpi { hid, uid } => match hid {
            PCI_ROOT_HID => write!(w, "PciRoot({uid:#x})")?,
            PCIE_ROOT_HID => write!(w, "PcieRoot({uid:#x})")?,
            FLOPPY_HID => write!(w, "Floppy({uid:#x})")?,
            KEYBOARD_HID => write!(w, "Keyboard({uid:#x})")?,
            SERIAL_HID => write!(w, "Serial({uid:#x})")?,
            _ => write!(w, "Acpi({hid:#x},{uid:#x})")?,
        },
        AcpiNode::Expanded {
            hid,
            uid,
            cid,
            hid_str,
            uid_str,
            cid_str,
        } => {
            if !uid_str.is_empty() && hid == PCI_ROOT_HID {
                w.write_str("PciRoot(")?;
                ascii(w, uid_str)?;
                w.write_char(')')?;
            } else if !uid_str.is_empty() && hid == PCIE_ROOT_HID {
                w.write_str("PcieRoot(")?;
                ascii(w, uid_str)?;
                w.write_char(')')?;
            } else if hid_str.is_empty() && cid_str.is_empty() && (!uid_str.is_empty() || uid != 0)
            {
                write!(w, "AcpiExp({hid:#x},{cid:#x},")?;
                if uid_str.is_empty() {
                    write!(w, "{uid:#x})")?;
                } else {
                    ascii(w, uid_str)?;
                    w.write_char(')')?;
                }
            } else {
                w.write_str("AcpiEx(")?;
                if hid_str.is_empty() {
                    write!(w, "{hid:#x},")?;
                } else {
                    ascii(w, hid_str)?;
                    w.write_char(',')?;
                }
                if cid_str.is_empty() {
                    write!(w, "{cid:#x},")?;
                } else {
                    ascii(w, cid_str)?;
                    w.write_char(',')?;
                }
                if uid_str.is_empty() {
                    write!(w, "{uid:#x})")?;
                } else {
                    ascii(w, uid_str)?;
                    w.write_char(')')?;
                }
            }
        }
        AcpiNode::Adr { data } => {
            w.write_str("AcpiAdr(")?;
            for (i, chunk) in data.chunks_exact(4).enumerate() {
                if i != 0 {
                    w.write_char(',')?;
                }
                let adr = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                write!(w, "{adr:#x}")?;
            }
            w.write_char(')')?;
        }
        AcpiNode::Unknown { sub_type, data } => {
            write!(w, "AcpiPath({sub_type},")?;
            hex(w, data)?;
            w.write_char(')')?;
        }
    }
    Ok(())
}

fn render_messaging<W: Write>(w: &mut W, node: MessagingNode) -> Result<()> {
    match node {
        MessagingNode::Atapi {
            primary,
            slave,
            logical_unit_number,
        } => write!(w, "Ata({primary},{slave},{logical_unit_number})")?,
        MessagingNode::Scsi {
            target_id,
            logical_unit_number,
        } => write!(w, "SCSI({target_id},{logical_unit_number})")?,
        MessagingNode::FibreChannel {
            world_wide_name,
            logical_unit_number,
        }
        | MessagingNode::FibreChannelEx {
            world_wide_name,
            logical_unit_number,
        } => write!(w, "Fibre({world_wide_name:x},{logical_unit_number:x})")?,
        MessagingNode::Ieee1394 { guid } => write!(w, "I1394({guid:#x})")?,
        MessagingNode::Usb {
            parent_port_number,
            interface,
        } => write!(w, "USB({parent_port_number},{interface})")?,
        MessagingNode::I2o { target_id } => write!(w, "I2O({target_id})")?,
        MessagingNode::Infiniband {
            resource_flags,
            port_gid,
            ioc_guid_or_service_id,
            target_port_id,
            device_id,
        } => {
            write!(
                w,
                "Infiniband({:08x},{:x}{:x},{:x},{},{})",
                resource_flags.bits(),
                port_gid[1],
                port_gid[0],
                ioc_guid_or_service_id,
                target_port_id,
                device_id
            )?;
        }
        MessagingNode::Vendor {
            vendor_guid,
            vendor_defined_data,
        } => render_messaging_vendor(w, vendor_guid, vendor_defined_data)?,
        MessagingNode::MacAddress {
            mac_address,
            interface_type,
        } => {
            w.write_str("MAC(")?;
            let len = if interface_type < 2 { 6 } else { 32 };
            hex(w, &mac_address[..len])?;
            write!(w, ",{interface_type})")?;
        }
        MessagingNode::Ipv4 {
            local_ip_address: l,
            remote_ip_address: r,
            local_port,
            remote_port,
            protocol,
            ip_address_origin,
            ..
        } => {
            write!(
                w,
                "IPv4({}.{}.{}.{}:{}<->{}.{}.{}.{}:{},{:x},{:x})",
                l[0],
                l[1],
                l[2],
                l[3],
                local_port,
                r[0],
                r[1],
                r[2],
                r[3],
                remote_port,
                protocol,
                ip_address_origin.0
            )?;
        }
        MessagingNode::Ipv6 {
            local_ip_address,
            remote_ip_address,
            local_port,
            remote_port,
            protocol,
            ip_address_origin,
        } => {
            w.write_str("IPv6(")?;
            ipv6_with_port(w, &local_ip_address, local_port)?;
            w.write_str("<->")?;
            ipv6_with_port(w, &remote_ip_address, remote_port)?;
            write!(w, ",{:x},{:x})", protocol, ip_address_origin.0)?;
        }
        MessagingNode::Uart {
            baud_rate,
            data_bits,
            parity,
            stop_bits,
        } => {
            let baud_rate = if baud_rate == 0 { 115_200 } else { baud_rate };
            let data_bits = if data_bits == 0 { 8 } else { data_bits };
            write!(w, "Uart({baud_rate},{data_bits},")?;
            match parity {
                0..=5 => w.write_char(['D', 'N', 'E', 'O', 'M', 'S'][usize::from(parity)])?,
                _ => write!(w, "{parity}")?,
            }
            w.write_char(',')?;
            match stop_bits {
                0..=3 => w.write_str(["D", "1", "1.5", "2"][usize::from(stop_bits)])?,
                _ => write!(w, "{stop_bits}")?,
            }
            w.write_char(')')?;
        }
        MessagingNode::UsbClass {
            vendor_id,
            product_id,
            device_class,
            device_subclass,
            device_protocol,
        } => {
            let label = match device_class {
                0x01 => Some("UsbAudio"),
                0x02 => Some("UsbCDCControl"),
                0x03 => Some("UsbHID"),
                0x06 => Some("UsbImage"),
                0x07 => Some("UsbPrinter"),
                0x08 => Some("UsbMassStorage"),
                0x09 => Some("UsbHub"),
                0x0a => Some("UsbCDCData"),
                0x0b => Some("UsbSmartCard"),
                0x0e => Some("UsbVideo"),
                0xdc => Some("UsbDiagnostic"),
                0xde => Some("UsbWireless"),
                _ => None,
            };
            if let Some(label) = label {
                write!(
                    w,
                    "{label}({vendor_id:#x},{product_id:#x},{device_subclass},{device_protocol})"
                )?;
            } else if device_class == 0xfe {
                let label = match device_subclass {
                    0x01 => "UsbDeviceFirmwareUpdate",
                    0x02 => "UsbIrdaBridge",
                    0x03 => "UsbTestAndMeasurement",
                    _ => "UsbClass",
                };
                if label == "UsbClass" {
                    write!(
                        w,
                        "UsbClass({vendor_id:x},{product_id:x},{device_subclass},{device_protocol})"
                    )?;
                } else {
                    write!(w, "{label}({vendor_id:#x},{product_id:#x},{device_protocol})")?;
                }
            } else {
                write!(
                    w,
                    "UsbClass({vendor_id:x},{product_id:x},{device_subclass},{device_protocol})"
                )?;
            }
        }
        MessagingNode::UsbWwid {
            interface_number,
            device_vendor_id,
            device_product_id,
            serial_number,
        } => {
            write!(
                w,
                "UsbWwid({device_vendor_id:x},{device_product_id:x},{interface_number},"
            )?;
            ucs2_str(w, serial_number)?;
            w.write_char(')')?;
        }
        MessagingNode::DeviceLogicalUnit {
            logical_unit_number,
        } => write!(w, "Unit({logical_unit_number})")?,
        MessagingNode::Sata {
            hba_port_number,
            port_multiplier_port_number,
            logical_unit_number,
        } => {
            write!(
                w,
                "Sata({hba_port_number},{port_multiplier_port_number},{logical_unit_number})"
            )?;
        }
        MessagingNode::Iscsi {
            protocol,
            options,
            logical_unit_number,
            target_portal_group_tag,
            iscsi_target_name,
        } => {
            let name_len = iscsi_target_name.len().min(ISCSI_MAX_TARGET_NAME_LEN);
            w.write_str("iSCSI(")?;
            ascii(w, &iscsi_target_name[..name_len])?;
            let lun = u64::from_be_bytes(logical_unit_number);
            write!(w, ",{target_portal_group_tag},{lun:#x},")?;
            let header_digest = if options.contains(IscsiLoginOptions::HEADER_DIGEST_CRC32) {
                "CRC32"
            } else {
                "None"
            };
            let data_digest = if options.contains(IscsiLoginOptions::DATA_DIGEST_CRC32) {
                "CRC32"
            } else {
                "None"
            };
            let auth = if options.contains(IscsiLoginOptions::AUTH_METHOD_NONE) {
                "None"
            } else if options.contains(IscsiLoginOptions::AUTH_METHOD_CHAP_UNI) {
                "CHAP_UNI"
            } else {
                "CHAP_BI"
            };
            let protocol = if protocol == IscsiProtocol::TCP {
                "TCP"
            } else {
                "Unknown"
            };
            write!(w, "{header_digest},{data_digest},{auth},{protocol})")?;
        }
        MessagingNode::Vlan { vlan_id } => write!(w, "Vlan({vlan_id})")?,
        MessagingNode::SasEx {
            sas_address,
            logical_unit_number,
            device_topology_info,
            drive_bay_id,
            rtp,
        } => {
            sas(
                w,
                sas_address,
                logical_unit_number,
                rtp,
                device_topology_info,
                drive_bay_id,
            )?;
        }
        MessagingNode::NvmeNamespace {
            namespace_identifier,
            ieee_extended_unique_identifier: eui,
        } => {
            write!(
                w,
                "NVMe({namespace_identifier:#x},\
                 {:02X}-{:02X}-{:02X}-{:02X}-{:02X}-{:02X}-{:02X}-{:02X})",
                eui[0], eui[1], eui[2], eui[3], eui[4], eui[5], eui[6], eui[7]
            )?;
        }
        MessagingNode::Uri { value } => {
            w.write_str("Uri(")?;
            ascii(w, value)?;
            w.write_char(')')?;
        }
        MessagingNode::Ufs {
            target_id,
            logical_unit_number,
        } => write!(w, "UFS({target_id},{logical_unit_number:#04x})")?,
        MessagingNode::Sd { slot_number } => write!(w, "SD({slot_number})")?,
        MessagingNode::Bluetooth { device_address } => {
            w.write_str("Bluetooth(")?;
            hex_separated(w, &device_address, ':')?;
            w.write_char(')')?;
        }
        MessagingNode::Wifi { ssid } => {
            w.write_str("Wifi(")?;
            ascii(w, &ssid)?;
            w.write_char(')')?;
        }
        MessagingNode::Emmc { slot_number } => write!(w, "EMMC({slot_number})")?,
        MessagingNode::BluetoothLe {
            device_address,
            address_type,
        } => {
            w.write_str("BluetoothLE(")?;
            hex_separated(w, &device_address, ':')?;
            write!(w, ",{address_type})")?;
        }
        MessagingNode::Dns { is_ipv6, addresses } => {
            w.write_str("Dns(")?;
            for (i, addr) in addresses.chunks_exact(16).enumerate() {
                if i != 0 {
                    w.write_char(',')?;
                }
                if is_ipv6 == 0 {
                    write!(w, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])?;
                } else {
                    let mut octets = [0; 16];
                    octets.copy_from_slice(addr);
                    ipv6(w, &octets)?;
                }
            }
            w.write_char(')')?;
        }
        MessagingNode::NvdimmNamespace { uuid } => write!(w, "NVDIMM({uuid})")?,
        MessagingNode::Unknown { sub_type, data } => {
            write!(w, "Msg({sub_type},")?;
            hex(w, data)?;
            w.write_char(')')?;
        }
    }
    Ok(())
}

/// Messaging vendor nodes with a well-known GUID get a named or decoded
/// form; everything else renders as a generic `VenMsg`.
fn render_messaging_vendor<W: Write>(w: &mut W, guid: Guid, data: &[u8]) -> Result<()> {
    let label = match guid {
        PC_ANSI_GUID => "VenPcAnsi",
        VT_100_GUID => "VenVt100",
        VT_100_PLUS_GUID => "VenVt100Plus",
        VT_UTF8_GUID => "VenUtf8",
        DEBUG_PORT_GUID => "DebugPort",
        UART_FLOW_CONTROL_GUID => {
            if data.len() >= 4 {
                let value = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
                return match value {
                    0 => write!(w, "UartFlowControl(None)").map_err(Error::from),
                    1 => write!(w, "UartFlowControl(Hardware)").map_err(Error::from),
                    2 => write!(w, "UartFlowControl(XonXoff)").map_err(Error::from),
                    _ => write!(w, "UartFlowcontrol({value})").map_err(Error::from),
                };
            }
            return vendor(w, "VenMsg", guid, data);
        }
        SAS_GUID => {
            // reserved u32, address u64, lun u64, topology, bay, rtp u16
            if data.len() >= 24 {
                let address = u64::from_le_bytes(data[4..12].try_into().unwrap_or_default());
                let lun = u64::from_le_bytes(data[12..20].try_into().unwrap_or_default());
                let topology = data[20];
                let bay = data[21];
                let rtp = u16::from_le_bytes([data[22], data[23]]);
                return sas(w, address, lun, rtp, topology, bay);
            }
            return vendor(w, "VenMsg", guid, data);
        }
        _ => return vendor(w, "VenMsg", guid, data),
    };

    write!(w, "{label}(")?;
    if !data.is_empty() {
        hex(w, data)?;
    }
    w.write_char(')')?;
    Ok(())
}

/// Shared renderer for the SAS vendor node and the SAS Ex node.
fn sas<W: Write>(w: &mut W, address: u64, lun: u64, rtp: u16, topology: u8, bay: u8) -> Result<()> {
    write!(w, "SAS({address:x},{lun:x},{rtp:x},")?;

    let more_info = topology & 0x03;
    if more_info == 0 {
        w.write_str("NoTopology")?;
    } else {
        let device = (topology & 0x30) >> 4;
        let device_label = if device & 0x01 == 0 { "SAS" } else { "SATA" };
        let location_label = if device & 0x02 == 0 {
            "Internal"
        } else {
            "External"
        };
        let connect_label = if topology & 0x40 == 0 {
            "Direct"
        } else {
            "Expanded"
        };
        write!(w, "{device_label},{location_label},{connect_label}")?;
        if more_info == 2 {
            write!(w, ",{}", u16::from(bay) + 1)?;
        }
    }
    w.write_char(')')?;
    Ok(())
}

fn render_media<W: Write>(w: &mut W, node: MediaNode) -> Result<()> {
    match node {
        MediaNode::HardDrive {
            partition_number,
            partition_start,
            partition_size,
            partition_signature,
            signature_type,
            ..
        } => {
            write!(w, "HD({partition_number},")?;
            match signature_type {
                0x01 => {
                    let serial = u32::from_le_bytes([
                        partition_signature[0],
                        partition_signature[1],
                        partition_signature[2],
                        partition_signature[3],
                    ]);
                    write!(w, "MBR,{serial:#x},")?;
                }
                0x02 => {
                    let guid = Guid::from_bytes(partition_signature);
                    write!(w, "GPT,{guid},")?;
                }
                _ => {
                    write!(w, "{signature_type},")?;
                    hex(w, &partition_signature)?;
                    w.write_char(',')?;
                }
            }
            write!(w, "{partition_start:#x},{partition_size:#x})")?;
        }
        MediaNode::CdRom {
            boot_entry,
            partition_start,
            partition_size,
        } => write!(w, "CDROM({boot_entry},{partition_start:#x},{partition_size:#x})")?,
        MediaNode::Vendor {
            vendor_guid,
            vendor_defined_data,
        } => vendor(w, "VenMedia", vendor_guid, vendor_defined_data)?,
        MediaNode::FilePath { path_name } => {
            w.write_str("File(")?;
            ucs2_str(w, path_name)?;
            w.write_char(')')?;
        }
        MediaNode::Protocol { protocol_guid } => write!(w, "Media({protocol_guid})")?,
        MediaNode::PiwgFirmwareFile { fv_file_name } => write!(w, "FvFile({fv_file_name})")?,
        MediaNode::PiwgFirmwareVolume { fv_name } => write!(w, "FvVol({fv_name})")?,
        MediaNode::RelativeOffsetRange {
            starting_offset,
            ending_offset,
        } => write!(w, "Offset({starting_offset:#x},{ending_offset:#x})")?,
        MediaNode::RamDisk {
            starting_address,
            ending_address,
            disk_type,
            disk_instance,
        } => {
            let label = match disk_type {
                VIRTUAL_DISK_GUID => Some("VirtualDisk"),
                VIRTUAL_CD_GUID => Some("VirtualCD"),
                PERSISTENT_VIRTUAL_DISK_GUID => Some("PersistentVirtualDisk"),
                PERSISTENT_VIRTUAL_CD_GUID => Some("PersistentVirtualCD"),
                _ => None,
            };
            match label {
                Some(label) => write!(
                    w,
                    "{label}({starting_address:#x},{ending_address:#x},{disk_instance})"
                )?,
                None => write!(
                    w,
                    "Ramdisk({starting_address:#x},{ending_address:#x},\
                     {disk_instance},{disk_type})"
                )?,
            }
        }
        MediaNode::Unknown { sub_type, data } => {
            write!(w, "MediaPath({sub_type},")?;
            hex(w, data)?;
            w.write_char(')')?;
        }
    }
    Ok(())
}

fn render_bios_boot<W: Write>(w: &mut W, node: BiosBootNode) -> Result<()> {
    match node {
        BiosBootNode::Bbs {
            device_type,
            status_flag,
            description,
        } => {
            const TYPES: [&str; 7] = ["", "Floppy", "HD", "CDROM", "PCMCIA", "USB", "Network"];
            w.write_str("BBS(")?;
            match TYPES.get(usize::from(device_type)) {
                Some(label) if device_type > 0 => w.write_str(label)?,
                _ => write!(w, "{device_type}")?,
            }
            w.write_char(',')?;
            ascii(w, description)?;
            write!(w, ",{status_flag:#x})")?;
        }
        BiosBootNode::Unknown { sub_type, data } => {
            write!(w, "BbsPath({sub_type},")?;
            hex(w, data)?;
            w.write_char(')')?;
        }
    }
    Ok(())
}

/// `Label(guid)` or `Label(guid,hexdata)`.
fn vendor<W: Write>(w: &mut W, label: &str, guid: Guid, data: &[u8]) -> Result<()> {
    write!(w, "{label}({guid}")?;
    if !data.is_empty() {
        w.write_char(',')?;
        hex(w, data)?;
    }
    w.write_char(')')?;
    Ok(())
}

fn hex<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    for byte in bytes {
        write!(w, "{byte:02x}")?;
    }
    Ok(())
}

fn hex_separated<W: Write>(w: &mut W, bytes: &[u8], separator: char) -> Result<()> {
    for (i, byte) in bytes.iter().enumerate() {
        if i != 0 {
            w.write_char(separator)?;
        }
        write!(w, "{byte:02x}")?;
    }
    Ok(())
}

/// Write ASCII bytes up to the first NUL; anything non-printable is
/// replaced rather than emitted raw.
fn ascii<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    for &byte in bytes {
        if byte == 0 {
            break;
        }
        if byte.is_ascii_graphic() || byte == b' ' {
            w.write_char(char::from(byte))?;
        } else {
            w.write_char('?')?;
        }
    }
    Ok(())
}

/// Decode little-endian UCS-2 payload bytes up to the first NUL code
/// unit and write them as UTF-8.
fn ucs2_str<W: Write>(w: &mut W, payload: &[u8]) -> Result<()> {
    for pair in payload.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            break;
        }
        let mut status = Ok(());
        let decode = ucs2::decode_with(&[unit], |utf8| {
            status = match core::str::from_utf8(utf8) {
                Ok(s) => w.write_str(s).map_err(Error::from),
                Err(_) => Err(Error::Malformed),
            };
            Ok(())
        });
        if decode.is_err() {
            // Unpaired surrogate or similar; substitute.
            w.write_char('?')?;
        }
        status?;
    }
    Ok(())
}

/// `[address]:port`, compressing the largest run of zero groups with
/// `::`. A lone zero group is never compressed.
fn ipv6_with_port<W: Write>(w: &mut W, address: &[u8; 16], port: u16) -> Result<()> {
    w.write_char('[')?;
    ipv6(w, address)?;
    write!(w, "]:{port}")?;
    Ok(())
}

fn ipv6<W: Write>(w: &mut W, address: &[u8; 16]) -> Result<()> {
    let groups: [u16; 8] =
        core::array::from_fn(|i| u16::from_be_bytes([address[2 * i], address[2 * i + 1]]));

    // Deciding how to print an IPv6 address requires two passes, because
    // RFC 5952 says we have to use :: a) only once and b) to maximum
    // effect.
    let mut largest_size = 0;
    let mut largest_offset = None;
    let mut this_size = 0;
    let mut this_offset = None;
    for (i, group) in groups.iter().enumerate() {
        if *group == 0 {
            if this_size == 0 {
                this_offset = Some(i);
            }
            this_size += 1;
        } else if this_size > 0 {
            if this_size > largest_size {
                largest_size = this_size;
                largest_offset = this_offset;
            }
            this_size = 0;
            this_offset = None;
        }
    }
    if this_size > largest_size {
        largest_size = this_size;
        largest_offset = this_offset;
    }
    if largest_size == 1 {
        largest_offset = None;
    }

    let mut i = 0;
    let mut separator_needed = false;
    while i < 8 {
        if largest_offset == Some(i) {
            w.write_str("::")?;
            i += largest_size;
            separator_needed = false;
            continue;
        }
        if separator_needed {
            w.write_char(':')?;
        }
        write!(w, "{:x}", groups[i])?;
        separator_needed = true;
        i += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{self, BuildNode, DevicePathBuilder};
    use crate::nodes::{Ipv6AddressOrigin, PartitionFormat};
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use uguid::guid;

    fn build_path(nodes: &[&dyn BuildNode]) -> Vec<u8> {
        let mut v = Vec::new();
        let mut builder = DevicePathBuilder::with_vec(&mut v);
        for node in nodes {
            builder = builder.push(*node).unwrap();
        }
        builder.finalize().unwrap();
        v
    }

    fn format(bytes: &[u8]) -> alloc::string::String {
        DevicePath::try_from_bytes(bytes).unwrap().to_string()
    }

    #[test]
    fn test_format_pci() {
        let bytes = build_path(&[&build::hardware::Pci {
            function: 0x0,
            device: 0x1,
        }]);
        assert_eq!(format(&bytes), "Pci(0x1,0x0)");
    }

    #[test]
    fn test_format_acpi_and_pci_path() {
        let bytes = build_path(&[
            &build::acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0,
            },
            &build::hardware::Pci {
                function: 0x0,
                device: 0x1f,
            },
        ]);
        assert_eq!(format(&bytes), "PciRoot(0x0)/Pci(0x1f,0x0)");
    }

    #[test]
    fn test_format_hard_drive_gpt() {
        let bytes = build_path(&[&build::media::HardDrive {
            partition_number: 1,
            partition_start: 0x800,
            partition_size: 0x53000,
            partition_format: PartitionFormat::GPT,
            partition_signature: build::media::PartitionSignature::Guid(guid!(
                "15e39a00-1dd2-1000-8d7f-00a0c92408fc"
            )),
        }]);
        assert_eq!(
            format(&bytes),
            "HD(1,GPT,15e39a00-1dd2-1000-8d7f-00a0c92408fc,0x800,0x53000)"
        );
    }

    #[test]
    fn test_format_hard_drive_mbr() {
        let bytes = build_path(&[&build::media::HardDrive {
            partition_number: 2,
            partition_start: 0x3f,
            partition_size: 0x1000,
            partition_format: PartitionFormat::MBR,
            partition_signature: build::media::PartitionSignature::Mbr(0xdead_beef),
        }]);
        assert_eq!(format(&bytes), "HD(2,MBR,0xdeadbeef,0x3f,0x1000)");
    }

    #[test]
    fn test_format_file_path() {
        let bytes = build_path(&[&build::media::FilePath {
            path_name: "\\EFI\\BOOT\\BOOTX64.EFI",
        }]);
        assert_eq!(format(&bytes), "File(\\EFI\\BOOT\\BOOTX64.EFI)");
    }

    #[test]
    fn test_format_ipv6_compression() {
        let mut local = [0; 16];
        local[0] = 0x20;
        local[1] = 0x01;
        local[2] = 0x0d;
        local[3] = 0xb8;
        local[15] = 0x01;
        let bytes = build_path(&[&build::messaging::Ipv6 {
            local_ip_address: local,
            remote_ip_address: [0; 16],
            local_port: 0,
            remote_port: 0,
            protocol: 6,
            ip_address_origin: Ipv6AddressOrigin::MANUAL,
            prefix_length: 64,
            gateway_ip_address: [0; 16],
        }]);
        assert_eq!(format(&bytes), "IPv6([2001:db8::1]:0<->[::]:0,6,0)");
    }

    #[test]
    fn test_format_ipv6_lone_zero_group_not_compressed() {
        let mut w = CountingWriter { len: 0 };
        let mut s = alloc::string::String::new();
        // 2001:0:db8:1:1:1:1:1 - the single zero group stays.
        let addr = [
            0x20, 0x01, 0x00, 0x00, 0x0d, 0xb8, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01,
            0x00, 0x01,
        ];
        ipv6(&mut s, &addr).unwrap();
        assert_eq!(s, "2001:0:db8:1:1:1:1:1");
        // The counting writer agrees with the rendered length.
        ipv6(&mut w, &addr).unwrap();
        assert_eq!(w.len, s.len());
    }

    #[test]
    fn test_format_multi_instance_separator() {
        let mut v = Vec::new();
        let path = DevicePathBuilder::with_vec(&mut v)
            .push(&build::hardware::Pci {
                function: 0,
                device: 1,
            })
            .unwrap()
            .push(&build::end::Instance)
            .unwrap()
            .push(&build::messaging::Sd { slot_number: 0 })
            .unwrap()
            .finalize()
            .unwrap();
        assert_eq!(path.to_string(), "Pci(0x1,0x0),SD(0)");
    }

    #[test]
    fn test_format_vendor_alias() {
        let bytes = build_path(&[&build::messaging::Vendor {
            vendor_guid: crate::nodes::PC_ANSI_GUID,
            vendor_defined_data: &[],
        }]);
        assert_eq!(format(&bytes), "VenPcAnsi()");
    }

    #[test]
    fn test_format_uart_defaults() {
        // baud 0 and data bits 0 render as the device defaults.
        let mut payload = Vec::new();
        payload.extend(0u32.to_le_bytes());
        payload.extend(0u64.to_le_bytes());
        payload.extend([0u8, 1, 1]);
        let mut raw = Vec::new();
        crate::path::tests::add_node(&mut raw, 0x03, 0x0e, &payload);
        crate::path::tests::add_node(&mut raw, 0x7f, 0xff, &[]);
        assert_eq!(format(&raw), "Uart(115200,8,N,1)");
    }

    #[test]
    fn test_format_nvme() {
        let bytes = build_path(&[&build::messaging::NvmeNamespace {
            namespace_identifier: 1,
            ieee_extended_unique_identifier: Some([1, 2, 3, 4, 5, 6, 7, 8]),
        }]);
        assert_eq!(format(&bytes), "NVMe(0x1,01-02-03-04-05-06-07-08)");
    }

    #[test]
    fn test_format_iscsi() {
        let bytes = build_path(&[&build::messaging::Iscsi {
            protocol: IscsiProtocol::TCP,
            options: IscsiLoginOptions::AUTH_METHOD_NONE,
            logical_unit_number: [0, 0, 0, 0, 0, 0, 0, 1],
            target_portal_group_tag: 1,
            iscsi_target_name: b"iqn.2009-01.example:disk\0",
        }]);
        assert_eq!(
            format(&bytes),
            "iSCSI(iqn.2009-01.example:disk,1,0x1,None,None,None,TCP)"
        );
    }

    #[test]
    fn test_format_unknown_node_degrades_to_hex() {
        let mut raw = Vec::new();
        crate::path::tests::add_node(&mut raw, 0x60, 0x07, &[0xab, 0xcd]);
        crate::path::tests::add_node(&mut raw, 0x7f, 0xff, &[]);
        assert_eq!(format(&raw), "Path(96,7,abcd)");
    }

    #[test]
    fn test_format_size_query_idiom() {
        let bytes = build_path(&[
            &build::acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0,
            },
            &build::hardware::Pci {
                function: 0x0,
                device: 0x1,
            },
        ]);
        let path = DevicePath::try_from_bytes(&bytes).unwrap();

        let size = formatted_size(path, None).unwrap();
        assert_eq!(size, "PciRoot(0x0)/Pci(0x1,0x0)".len());

        // Formatting with exactly the queried size succeeds and writing
        // into anything smaller reports insufficient space.
        let mut buf = alloc::vec![0; size];
        assert_eq!(format_device_path(&mut buf, path, None).unwrap(), size);
        assert_eq!(&buf, "PciRoot(0x0)/Pci(0x1,0x0)".as_bytes());

        let mut small = alloc::vec![0; size - 1];
        assert_eq!(
            format_device_path(&mut small, path, None).unwrap_err(),
            Error::InsufficientSpace
        );

        // Formatting twice produces identical strings.
        let mut buf2 = alloc::vec![0; size];
        format_device_path(&mut buf2, path, None).unwrap();
        assert_eq!(buf, buf2);
    }

    #[test]
    fn test_format_limit() {
        let bytes = build_path(&[
            &build::acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0,
            },
            &build::hardware::Pci {
                function: 0x0,
                device: 0x1,
            },
        ]);
        let path = DevicePath::try_from_bytes(&bytes).unwrap();

        // A limit covering only the first node renders only it.
        let size = formatted_size(path, Some(12)).unwrap();
        let mut buf = alloc::vec![0; size];
        format_device_path(&mut buf, path, Some(12)).unwrap();
        assert_eq!(&buf, "PciRoot(0x0)".as_bytes());

        // A limit smaller than the first node renders nothing.
        assert_eq!(formatted_size(path, Some(2)).unwrap_err(), Error::Malformed);
    }

    #[test]
    fn test_parse_is_unsupported() {
        let mut buf = [0; 64];
        assert_eq!(
            parse_device_path("PciRoot(0x0)", &mut buf).unwrap_err(),
            Error::Unsupported
        );
        assert_eq!(
            parse_device_node("Pci(0x1,0x0)", &mut buf).unwrap_err(),
            Error::Unsupported
        );
    }
}
