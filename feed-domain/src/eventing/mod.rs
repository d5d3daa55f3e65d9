//! 事件接入子系统（eventing）
//!
//! 将外部业务事件（消息总线投递）转换为对写路径的调用：
//! - `BusinessEvent`：通用业务事件（类型标签 + 扩展字段）；
//! - `EventBus`：统一发布/订阅接口；
//! - `EventHandler`：对业务事件进行消费处理；
//! - `EventConsumer`：订阅总线的长驻消费循环，逐条超时控制，失败记录后继续。
//!
//! 投递语义为“至少一次”，本模块不做去重。
//!
pub mod bus;
pub mod bus_inmemory;
pub mod consumer;
pub mod handler;
pub mod message;

pub use bus::EventBus;
pub use bus_inmemory::InMemoryEventBus;
pub use consumer::{ConsumerHandle, EventConsumer, EventConsumerConfig};
pub use handler::EventHandler;
pub use message::BusinessEvent;
