mod discovery;
mod hierarchy;
mod session;
