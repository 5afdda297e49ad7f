use bmx280_sensor::sensor::bmx280::{Chip, Config, Mode, Oversampling, Reading, SensorIndex, Variant};
use bmx280_sensor::{Bmx280, Bmx280Error};
use embedded_hal_mock::eh1::delay::{CheckedDelay, NoopDelay, Transaction as DelayTransaction};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

fn read(address: u8, reg: u8, data: &[u8]) -> [I2cTransaction; 2] {
    [
        I2cTransaction::write(address, vec![reg]),
        I2cTransaction::read(address, data.to_vec()),
    ]
}

/// 温度、压力校准参数（数据手册示例值）
fn coefficient_reads(address: u8) -> Vec<I2cTransaction> {
    [
        read(address, 0x88, &[0x70, 0x6B]),
        read(address, 0x8A, &[0x43, 0x67]),
        read(address, 0x8C, &[0x18, 0xFC]),
        read(address, 0x8E, &[0x7D, 0x8E]),
        read(address, 0x90, &[0x43, 0xD6]),
        read(address, 0x92, &[0xD0, 0x0B]),
        read(address, 0x94, &[0x27, 0x0B]),
        read(address, 0x96, &[0x8C, 0x00]),
        read(address, 0x98, &[0xF9, 0xFF]),
        read(address, 0x9A, &[0x8C, 0x3C]),
        read(address, 0x9C, &[0xF8, 0xC6]),
        read(address, 0x9E, &[0x70, 0x17]),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// 湿度校准参数：H1=75, H2=362, H3=0, H4=313, H5=50, H6=30
fn humidity_coefficient_reads(address: u8) -> Vec<I2cTransaction> {
    [
        read(address, 0xA1, &[0x4B]),
        read(address, 0xE1, &[0x6A, 0x01]),
        read(address, 0xE3, &[0x00]),
        read(address, 0xE4, &[0x13, 0x29]),
        read(address, 0xE5, &[0x29, 0x03]),
        read(address, 0xE7, &[0x1E]),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn reset(address: u8) -> Vec<I2cTransaction> {
    let mut transactions = vec![I2cTransaction::write(address, vec![0xE0, 0xB6])];
    transactions.extend(read(address, 0xF3, &[0x00]));
    transactions
}

#[test]
fn bme280_init_order() {
    const ADDR: u8 = 0x77;

    let mut expectations = Vec::from(read(ADDR, 0xD0, &[0x60]));
    expectations.extend(reset(ADDR));
    expectations.extend(coefficient_reads(ADDR));
    expectations.extend(humidity_coefficient_reads(ADDR));
    expectations.extend([
        I2cTransaction::write(ADDR, vec![0xF2, 0x05]),
        I2cTransaction::write(ADDR, vec![0xF5, 0x6C]),
        I2cTransaction::write(ADDR, vec![0xF4, 0xB7]),
    ]);

    // 第一次查询状态就已就绪，只有复位后的2ms等待
    let mut delay = CheckedDelay::new(&[DelayTransaction::delay_ms(2)]);

    let mut i2c = I2cMock::new(&expectations);
    let sensor = Bmx280::init(&mut i2c, 0, Config::default(), &mut delay).unwrap();

    assert_eq!(sensor.index(), SensorIndex::Primary);
    assert_eq!(sensor.address(), ADDR);
    assert_eq!(sensor.chip(), Chip::Bme280);
    assert_eq!(sensor.calibration().dig_t1, 27504);
    match sensor.variant() {
        Variant::Bme280(humidity) => {
            assert_eq!(humidity.dig_h4, 313);
            assert_eq!(humidity.dig_h5, 50);
        }
        Variant::Bmp280 => panic!("expected humidity coefficients"),
    }

    i2c.done();
    delay.done();
}

#[test]
fn bmp280_init_skips_humidity() {
    const ADDR: u8 = 0x76;

    let config = Config::default()
        .with_humidity_oversampling(Oversampling::Skipped)
        .with_mode(Mode::Forced);

    let mut expectations = Vec::from(read(ADDR, 0xD0, &[0x58]));
    expectations.extend(reset(ADDR));
    expectations.extend(coefficient_reads(ADDR));
    expectations.extend([
        I2cTransaction::write(ADDR, vec![0xF5, 0x6C]),
        I2cTransaction::write(ADDR, vec![0xF4, 0xB5]),
    ]);

    let mut i2c = I2cMock::new(&expectations);
    let sensor = Bmx280::init(&mut i2c, 1, config, &mut NoopDelay::new()).unwrap();

    assert_eq!(sensor.chip(), Chip::Bmp280);
    assert_eq!(sensor.variant(), &Variant::Bmp280);

    i2c.done();
}

#[test]
fn two_sensors_share_one_bus() {
    let mut expectations = Vec::new();
    for (address, chip_id) in [(0x77, 0x60), (0x76, 0x58)] {
        expectations.extend(read(address, 0xD0, &[chip_id]));
        expectations.extend(reset(address));
        expectations.extend(coefficient_reads(address));
        if chip_id == 0x60 {
            expectations.extend(humidity_coefficient_reads(address));
            expectations.push(I2cTransaction::write(address, vec![0xF2, 0x05]));
        }
        expectations.extend([
            I2cTransaction::write(address, vec![0xF5, 0x6C]),
            I2cTransaction::write(address, vec![0xF4, 0xB7]),
        ]);
    }
    // 两颗传感器交替读取
    expectations.extend(read(0x77, 0xFA, &[0x7E, 0xED, 0x00]));
    expectations.extend(read(0x76, 0xFA, &[0x7E, 0xED, 0x00]));
    expectations.extend(read(0x76, 0xF7, &[0x65, 0x5A, 0xC0]));
    expectations.extend(read(0x77, 0xF7, &[0x80, 0x00, 0x00]));

    let mut i2c = I2cMock::new(&expectations);
    let mut delay = NoopDelay::new();
    let primary = Bmx280::init(&mut i2c, 0, Config::default(), &mut delay).unwrap();
    let secondary = Bmx280::init(&mut i2c, 1, Config::default(), &mut delay).unwrap();
    assert_ne!(primary.address(), secondary.address());

    let primary_fine = primary.read_temperature(&mut i2c).unwrap().value().unwrap().fine;
    let secondary_fine = secondary.read_temperature(&mut i2c).unwrap().value().unwrap().fine;

    // 同样的原始数据、同样的校准参数，精细温度数值相同但属于不同传感器
    assert_eq!(primary_fine.value(), secondary_fine.value());
    assert_ne!(primary_fine, secondary_fine);
    assert_eq!(
        secondary.read_pressure(&mut i2c, primary_fine).unwrap_err(),
        Bmx280Error::ForeignFineTemperature
    );

    let pressure = secondary.read_pressure(&mut i2c, secondary_fine).unwrap();
    assert!((pressure.or_nan() - 100_653.25).abs() < 0.01);

    let pressure = primary.read_pressure(&mut i2c, primary_fine).unwrap();
    assert_eq!(pressure, Reading::Disabled);

    i2c.done();
}

#[test]
fn unknown_chip_aborts_init() {
    let mut i2c = I2cMock::new(&read(0x77, 0xD0, &[0xFF]));

    let err = Bmx280::init(&mut i2c, 0, Config::default(), &mut NoopDelay::new()).unwrap_err();
    assert_eq!(err, Bmx280Error::UnknownDevice(0xFF));

    i2c.done();
}
