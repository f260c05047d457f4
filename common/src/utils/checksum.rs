use crc::{Crc, CRC_16_IBM_3740};

/// CRC-16/IBM-3740，多项式0x1021，初始值0xFFFF
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// 计算CRC-16校验和
pub fn calculate_checksum(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

/// 快速验证校验和，用于判断两个数据帧是否相同
pub fn verify_checksum(data: &[u8], checksum: u16) -> bool {
    calculate_checksum(data) == checksum
}
