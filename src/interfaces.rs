//! Local network interface enumeration and resolution.
//!
//! The metadata service tells us which addresses are ours; this module finds
//! out which kernel interface actually carries a given address, since that
//! interface name is what the firewall rules are scoped to.

use crate::cmd::{args_to_strings, CommandExecutor};
use crate::error::DroplanError;

/// A local interface with its bound addresses in OS-reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub addresses: Vec<String>,
}

/// Enumerate local interfaces via `ip -o addr show`.
pub fn local_interfaces(executor: &dyn CommandExecutor) -> Result<Vec<Interface>, DroplanError> {
    let output = executor
        .execute("ip", &args_to_strings(&["-o", "addr", "show"]))
        .map_err(|e| DroplanError::Interfaces(e.to_string()))?;

    if !output.success {
        return Err(DroplanError::Interfaces(output.stderr.trim().to_string()));
    }

    Ok(parse_ip_addr_output(&output.stdout))
}

/// Parse `ip -o addr show` output: one line per address, e.g.
/// `2: eth0    inet 10.0.0.5/24 brd 10.0.0.255 scope global eth0`.
fn parse_ip_addr_output(stdout: &str) -> Vec<Interface> {
    let mut interfaces: Vec<Interface> = Vec::new();

    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        let (Some(_index), Some(name), Some(_family), Some(cidr)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        let name = name.trim_end_matches(':');
        let address = cidr.split('/').next().unwrap_or(cidr).to_string();

        match interfaces.iter_mut().find(|i| i.name == name) {
            Some(iface) => iface.addresses.push(address),
            None => interfaces.push(Interface {
                name: name.to_string(),
                addresses: vec![address],
            }),
        }
    }

    interfaces
}

/// Name of the interface that carries `target`.
///
/// Interfaces and their addresses are scanned in order; the first exact
/// textual match wins. No subnet matching and no address normalization —
/// the metadata service and the kernel print IPv4 the same way.
pub fn find_interface_name<'a>(
    interfaces: &'a [Interface],
    target: &str,
) -> Result<&'a str, DroplanError> {
    for iface in interfaces {
        for address in &iface.addresses {
            if address == target {
                return Ok(&iface.name);
            }
        }
    }

    Err(DroplanError::InterfaceNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP_ADDR_OUTPUT: &str = "\
1: lo    inet 127.0.0.1/8 scope host lo\\       valid_lft forever preferred_lft forever
1: lo    inet6 ::1/128 scope host \\       valid_lft forever preferred_lft forever
2: eth0    inet 104.131.20.105/18 brd 104.131.63.255 scope global eth0\\       valid_lft forever preferred_lft forever
2: eth0    inet6 fe80::601:2aff:fe0f:2a02/64 scope link \\       valid_lft forever preferred_lft forever
3: eth1    inet 10.132.255.113/16 brd 10.132.255.255 scope global eth1\\       valid_lft forever preferred_lft forever
";

    fn parsed() -> Vec<Interface> {
        parse_ip_addr_output(IP_ADDR_OUTPUT)
    }

    #[test]
    fn test_parse_groups_addresses_by_interface() {
        let interfaces = parsed();
        assert_eq!(interfaces.len(), 3);
        assert_eq!(interfaces[0].name, "lo");
        assert_eq!(interfaces[0].addresses, vec!["127.0.0.1", "::1"]);
        assert_eq!(interfaces[1].name, "eth0");
        assert_eq!(interfaces[1].addresses[0], "104.131.20.105");
        assert_eq!(interfaces[2].name, "eth1");
        assert_eq!(interfaces[2].addresses, vec!["10.132.255.113"]);
    }

    #[test]
    fn test_parse_skips_short_lines() {
        let interfaces = parse_ip_addr_output("garbage\n\n2: eth0    inet 10.0.0.1/24\n");
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].addresses, vec!["10.0.0.1"]);
    }

    #[test]
    fn test_find_first_bound_address() {
        let interfaces = parsed();
        let first = &interfaces[0];
        let name = find_interface_name(&interfaces, &first.addresses[0]).unwrap();
        assert_eq!(name, first.name);
    }

    #[test]
    fn test_find_private_interface() {
        let interfaces = parsed();
        assert_eq!(
            find_interface_name(&interfaces, "10.132.255.113").unwrap(),
            "eth1"
        );
    }

    #[test]
    fn test_no_match_is_not_found() {
        let interfaces = parsed();
        let err = find_interface_name(&interfaces, "192.0.2.200").unwrap_err();
        assert!(matches!(err, DroplanError::InterfaceNotFound));
        assert_eq!(err.to_string(), "local interface could not be found");
    }

    #[test]
    fn test_no_subnet_matching() {
        let interfaces = parsed();
        // same /16 as eth1, but not the bound address itself
        assert!(find_interface_name(&interfaces, "10.132.0.1").is_err());
    }
}
