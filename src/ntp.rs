//! Minimal SNTP client.
//!
//! Sends a single client-mode request and reads the seconds field of the
//! transmit timestamp from the reply. Waiting is bounded by an explicit
//! deadline: the socket read timeout is recomputed from the time remaining
//! on every pass, so a silent server yields [`SyncError::Timeout`] instead
//! of blocking.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use crate::constants::{
    NTP_ERA_SECONDS, NTP_PACKET_SIZE, NTP_TRANSMIT_SECONDS_OFFSET, NTP_UNIX_EPOCH_DIFF,
};
use crate::sync::SyncError;

/// Something that can fetch raw NTP seconds (since 1900) from a server.
#[cfg_attr(test, mockall::automock)]
pub trait TimeQuery {
    fn query(&self, server: &str, timeout: Duration) -> Result<u32, SyncError>;
}

/// Build a 48-byte client request.
pub fn request_packet() -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = 0b1110_0011; // LI = 3 (unsynchronised), VN = 4, Mode = 3 (client)
    packet[1] = 0; // stratum
    packet[2] = 6; // poll interval
    packet[3] = 0xEC; // precision
    // bytes 4..12 root delay/dispersion stay zero
    packet[12..16].copy_from_slice(&[49, 0x4E, 49, 52]); // reference id
    packet
}

/// Seconds field of the transmit timestamp, if the reply is long enough.
pub fn parse_transmit_seconds(reply: &[u8]) -> Option<u32> {
    if reply.len() < NTP_PACKET_SIZE {
        return None;
    }
    let bytes: [u8; 4] = reply[NTP_TRANSMIT_SECONDS_OFFSET..NTP_TRANSMIT_SECONDS_OFFSET + 4]
        .try_into()
        .ok()?;
    Some(u32::from_be_bytes(bytes))
}

/// Convert NTP seconds (since 1900) to Unix seconds (since 1970).
///
/// The 32-bit counter wraps on 2036-02-07. Values with the top bit clear
/// belong to the era after the wrap (RFC 4330 section 3), so the usable
/// range runs from 1970 to 2104. Returns `None` for a zero timestamp and
/// for instants before 1970.
pub fn ntp_to_unix(ntp_seconds: u32) -> Option<i64> {
    if ntp_seconds == 0 {
        return None;
    }
    let era_offset = if ntp_seconds & 0x8000_0000 == 0 {
        NTP_ERA_SECONDS
    } else {
        0
    };
    let unix = i64::from(ntp_seconds) + era_offset - NTP_UNIX_EPOCH_DIFF;
    (unix >= 0).then_some(unix)
}

/// SNTP client over a UDP socket bound once at startup.
#[derive(Debug)]
pub struct UdpNtpClient {
    socket: UdpSocket,
    port: u16,
}

impl UdpNtpClient {
    /// Bind the local socket. `local_port` 0 picks an ephemeral port.
    pub fn bind(local_port: u16, server_port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, local_port))
            .with_context(|| format!("Failed to bind UDP port {local_port}"))?;
        log_debug!(
            "NTP socket bound to {}",
            socket
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "?".to_string())
        );
        Ok(Self {
            socket,
            port: server_port,
        })
    }

    fn resolve(&self, server: &str) -> Result<SocketAddr, SyncError> {
        let resolve_error = |reason: String| SyncError::Resolve {
            server: server.to_string(),
            reason,
        };
        (server, self.port)
            .to_socket_addrs()
            .map_err(|e| resolve_error(e.to_string()))?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| resolve_error("no IPv4 address".to_string()))
    }

    /// Discard datagrams left over from earlier, unanswered requests.
    fn drain_stale(&self) -> Result<(), SyncError> {
        let mut scratch = [0u8; NTP_PACKET_SIZE];
        self.socket.set_nonblocking(true)?;
        let mut drained = 0usize;
        while self.socket.recv_from(&mut scratch).is_ok() {
            drained += 1;
        }
        self.socket.set_nonblocking(false)?;
        if drained > 0 {
            log_debug!("Discarded {drained} stale datagram(s)");
        }
        Ok(())
    }
}

impl TimeQuery for UdpNtpClient {
    fn query(&self, server: &str, timeout: Duration) -> Result<u32, SyncError> {
        self.drain_stale()?;

        let addr = self.resolve(server)?;
        log_debug!("Transmit NTP request to {server} ({addr})");
        self.socket.send_to(&request_packet(), addr)?;

        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; 512];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SyncError::Timeout {
                    server: server.to_string(),
                    timeout,
                });
            }
            self.socket.set_read_timeout(Some(remaining))?;

            match self.socket.recv_from(&mut buf) {
                Ok((len, from)) => match parse_transmit_seconds(&buf[..len]) {
                    Some(seconds) => {
                        log_debug!("Receive NTP response from {from}");
                        return Ok(seconds);
                    }
                    None => log_debug!("Ignoring {len}-byte datagram from {from}"),
                },
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Reply carrying `seconds` in the transmit timestamp.
    fn reply_with(seconds: u32) -> [u8; NTP_PACKET_SIZE] {
        let mut reply = [0u8; NTP_PACKET_SIZE];
        reply[0] = 0b0010_0100; // VN = 4, Mode = 4 (server)
        reply[40..44].copy_from_slice(&seconds.to_be_bytes());
        reply
    }

    /// Loopback server answering each request with the given datagrams.
    fn spawn_server(replies: Vec<Vec<u8>>) -> u16 {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = server.local_addr().unwrap().port();
        thread::spawn(move || {
            let mut buf = [0u8; NTP_PACKET_SIZE];
            if let Ok((len, peer)) = server.recv_from(&mut buf) {
                assert_eq!(len, NTP_PACKET_SIZE);
                assert_eq!(buf[0], 0b1110_0011);
                for reply in replies {
                    server.send_to(&reply, peer).unwrap();
                }
            }
        });
        port
    }

    #[test]
    fn test_request_packet_layout() {
        let packet = request_packet();
        assert_eq!(packet.len(), 48);
        assert_eq!(&packet[..4], &[0xE3, 0, 6, 0xEC]);
        assert!(packet[4..12].iter().all(|&b| b == 0));
        assert_eq!(&packet[12..16], &[49, 0x4E, 49, 52]);
        assert!(packet[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_parse_transmit_seconds() {
        let reply = reply_with(0xE9A1_B2C3);
        assert_eq!(parse_transmit_seconds(&reply), Some(0xE9A1_B2C3));
        assert_eq!(parse_transmit_seconds(&reply[..47]), None);

        let mut longer = reply.to_vec();
        longer.extend_from_slice(&[0xFF; 20]);
        assert_eq!(parse_transmit_seconds(&longer), Some(0xE9A1_B2C3));
    }

    #[test]
    fn test_ntp_to_unix() {
        assert_eq!(ntp_to_unix(2_208_988_800), Some(0));
        // 2024-01-01T00:00:00Z
        assert_eq!(ntp_to_unix(3_913_056_000), Some(1_704_067_200));
        assert_eq!(ntp_to_unix(0), None);
        // 1969-12-31T23:59:59Z, before the Unix epoch
        assert_eq!(ntp_to_unix(2_208_988_799), None);
    }

    #[test]
    fn test_ntp_to_unix_after_era_rollover() {
        // Last second of era 0: 2036-02-07T06:28:15Z
        assert_eq!(ntp_to_unix(u32::MAX), Some(2_085_978_495));
        // One second after the wrap: 2036-02-07T06:28:17Z
        assert_eq!(ntp_to_unix(1), Some(2_085_978_497));
        // 2040-01-01T00:00:00Z
        assert_eq!(ntp_to_unix(123_010_304), Some(2_208_988_800));
    }

    #[test]
    fn test_query_loopback() {
        let port = spawn_server(vec![reply_with(3_913_056_000).to_vec()]);
        let client = UdpNtpClient::bind(0, port).unwrap();

        let seconds = client
            .query("127.0.0.1", Duration::from_millis(1500))
            .unwrap();
        assert_eq!(seconds, 3_913_056_000);
    }

    #[test]
    fn test_query_skips_short_datagrams() {
        let port = spawn_server(vec![vec![0u8; 12], reply_with(3_913_056_001).to_vec()]);
        let client = UdpNtpClient::bind(0, port).unwrap();

        let seconds = client
            .query("127.0.0.1", Duration::from_millis(1500))
            .unwrap();
        assert_eq!(seconds, 3_913_056_001);
    }

    #[test]
    fn test_query_times_out_on_silent_server() {
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = silent.local_addr().unwrap().port();
        let client = UdpNtpClient::bind(0, port).unwrap();

        let timeout = Duration::from_millis(200);
        let started = Instant::now();
        let result = client.query("127.0.0.1", timeout);

        assert!(matches!(result, Err(SyncError::Timeout { .. })));
        assert!(started.elapsed() >= timeout);
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(silent);
    }

    #[test]
    fn test_query_resolve_failure() {
        let client = UdpNtpClient::bind(0, 123).unwrap();
        let result = client.query("no-such-host.invalid", Duration::from_millis(100));
        assert!(matches!(result, Err(SyncError::Resolve { .. })));
    }
}
