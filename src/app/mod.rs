// Application layer: wires config, providers and the moderation store into the gateway.

pub mod gateway;
