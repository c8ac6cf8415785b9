//! 网络探测 - 基础设施层
//!
//! 只暴露"网络是否可达"的能力，由调用方决定探测频率

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// 网络可达性探测
pub trait NetworkProbe: Send + Sync {
    fn is_reachable(&self) -> bool;
}

impl<P: NetworkProbe + ?Sized> NetworkProbe for Box<P> {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}

/// 通过 TCP 连接探测
///
/// 在调用线程上同步阻塞，最长 `timeout`
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }
}

impl NetworkProbe for TcpProbe {
    fn is_reachable(&self) -> bool {
        let addrs = match self.address.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("无法解析探测地址 {}: {}", self.address, e);
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => {
                    debug!("网络可达: {}", addr);
                    return true;
                }
                Err(e) => debug!("连接 {} 失败: {}", addr, e),
            }
        }

        false
    }
}

/// 固定结果的探测（测试或强制离线时使用）
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

impl NetworkProbe for StaticProbe {
    fn is_reachable(&self) -> bool {
        self.0
    }
}

/// 在 `ttl` 内复用上一次探测结果
pub struct CachedProbe<P> {
    inner: P,
    ttl: Duration,
    last: Mutex<Option<(Instant, bool)>>,
}

impl<P: NetworkProbe> CachedProbe<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            last: Mutex::new(None),
        }
    }

    /// 丢弃缓存，下次调用重新探测
    pub fn invalidate(&self) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl<P: NetworkProbe> NetworkProbe for CachedProbe<P> {
    fn is_reachable(&self) -> bool {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((at, reachable)) = *last {
            if at.elapsed() < self.ttl {
                return reachable;
            }
        }
        let reachable = self.inner.is_reachable();
        *last = Some((Instant::now(), reachable));
        reachable
    }
}
