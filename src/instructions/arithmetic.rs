use crate::adapter::Frame;

pub fn add(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.add(&b));
}

pub fn mul(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.mul(&b));
}

pub fn sub(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.sub(&b));
}

pub fn div(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.div(&b));
}

pub fn sdiv(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.sdiv(&b));
}

pub fn modulo(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.rem(&b));
}

pub fn smod(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.smod(&b));
}

pub fn addmod(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    let m = frame.pop().unwrap();
    frame.push(a.addmod(&b, &m));
}

pub fn mulmod(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    let m = frame.pop().unwrap();
    frame.push(a.mulmod(&b, &m));
}

pub fn exp(frame: &mut Frame) {
    let base = frame.pop().unwrap();
    let exponent = frame.pop().unwrap();
    frame.push(base.pow(&exponent));
}

pub fn signextend(frame: &mut Frame) {
    let byte_index = frame.pop().unwrap();
    let value = frame.pop().unwrap();
    frame.push(byte_index.signextend(&value));
}
