//! DMA transfers and their completion.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};

use common::{counting_completion, dma, spi, Board};
use stm32f1_spi::{
    binding::Binding,
    dma::{Handler, Status},
    Priority,
};

#[test]
fn full_duplex_arms_both_channels() {
    let board = Board::ready(Binding::SPI2);
    let tx = [0x9Fu8, 0, 0, 0];
    let mut rx = [0u8; 4];
    unsafe { board.spi.transfer_dma(tx.as_ptr(), rx.as_mut_ptr(), tx.len()) };

    let pl = dma::pl(Priority::High as u32);
    assert_eq!(board.rx_ccr(), pl | dma::MINC | dma::TEIE | dma::TCIE | dma::EN);
    assert_eq!(board.tx_ccr(), pl | dma::MINC | dma::DIR | dma::TEIE | dma::EN);
    assert_eq!(board.dma_regs.read(dma::cndtr(3)), 4);
    assert_eq!(board.dma_regs.read(dma::cndtr(4)), 4);
    assert_eq!(board.dma_regs.read(dma::cmar(3)), rx.as_ptr() as usize as u32);
    assert_eq!(board.dma_regs.read(dma::cmar(4)), tx.as_ptr() as usize as u32);
    assert_eq!(
        board.spi_regs.read(spi::CR2),
        spi::SSOE | spi::RXDMAEN | spi::TXDMAEN
    );
}

#[test]
fn half_transfer_interrupts_stay_off() {
    let board = Board::ready(Binding::SPI1);
    let buffer = [0u8; 8];
    unsafe { board.spi.transfer_dma(buffer.as_ptr(), buffer.as_ptr() as *mut u8, 8) };
    assert_eq!(board.rx_ccr() & dma::HTIE, 0);
    assert_eq!(board.tx_ccr() & dma::HTIE, 0);
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 8) };
    assert_eq!(board.rx_ccr() & dma::HTIE, 0);
    assert_eq!(board.tx_ccr() & dma::HTIE, 0);
}

#[test]
fn transmit_only_discards_into_one_byte() {
    let board = Board::ready(Binding::SPI1);
    let tx = [1u8, 2, 3];
    unsafe { board.spi.tx_dma(tx.as_ptr(), tx.len()) };

    let pl = dma::pl(Priority::Medium as u32);
    // No memory increment on receive, and receive carries completion.
    assert_eq!(board.rx_ccr(), pl | dma::TEIE | dma::TCIE | dma::EN);
    assert_eq!(board.tx_ccr(), pl | dma::MINC | dma::DIR | dma::TEIE | dma::EN);
    assert_eq!(board.dma_regs.read(dma::cndtr(1)), 3);
    assert_eq!(board.dma_regs.read(dma::cndtr(2)), 3);
    assert_eq!(board.dma_regs.read(dma::cmar(2)), tx.as_ptr() as usize as u32);

    let sink = board.dma_regs.read(dma::cmar(1));
    assert_ne!(sink, tx.as_ptr() as usize as u32);

    board.complete();
    let other = [4u8; 16];
    unsafe { board.spi.tx_dma(other.as_ptr(), other.len()) };
    assert_eq!(board.dma_regs.read(dma::cmar(1)), sink);
}

#[test]
fn in_progress_until_completion() {
    let board = Board::ready(Binding::SPI2);
    assert!(!board.spi.dma_in_progress());

    let mut buffer = [0u8; 32];
    unsafe { board.spi.transfer_dma(buffer.as_ptr(), buffer.as_mut_ptr(), 32) };
    assert!(board.spi.dma_in_progress());
    assert!(board.spi.dma_in_progress());

    board.complete();
    assert!(!board.spi.dma_in_progress());

    unsafe { board.spi.tx_dma(buffer.as_ptr(), 32) };
    assert!(board.spi.dma_in_progress());
    board.complete();
    assert!(!board.spi.dma_in_progress());
}

#[test]
fn completion_disarms_channels_and_requests() {
    let board = Board::ready(Binding::SPI3);
    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.complete();

    assert_eq!(board.rx_ccr(), 0);
    assert_eq!(board.tx_ccr(), 0);
    assert_eq!(board.spi_regs.read(spi::CR2), spi::SSOE);
    assert_eq!(board.spi_regs.read(spi::CR1), spi::MSTR | spi::SPE);
}

#[test]
fn completion_clears_channel_flags() {
    let board = Board::ready(Binding::SPI2);
    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.complete();
    assert_eq!(board.dma_regs.read(dma::IFCR), 0b1111 << (4 * 3));
}

#[test]
fn callback_runs_once_per_completion_with_its_parameter() {
    let board = Board::ready(Binding::SPI1);
    let (completion, count) = counting_completion();
    board.spi.set_completion(Some(completion));

    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    assert_eq!(count.load(Ordering::SeqCst), 0);
    board.complete();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let mut rx = [0u8; 4];
    unsafe { board.spi.transfer_dma(buffer.as_ptr(), rx.as_mut_ptr(), 4) };
    board.complete();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn callback_can_be_replaced_and_removed() {
    let board = Board::ready(Binding::SPI1);
    let (first, first_count) = counting_completion();
    let (second, second_count) = counting_completion();
    let buffer = [0u8; 2];

    board.spi.set_completion(Some(first));
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 2) };
    board.complete();

    board.spi.set_completion(Some(second));
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 2) };
    board.complete();

    board.spi.set_completion(None);
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 2) };
    board.complete();

    assert_eq!(first_count.load(Ordering::SeqCst), 1);
    assert_eq!(second_count.load(Ordering::SeqCst), 1);
    assert!(!board.spi.dma_in_progress());
}

#[test]
fn overrun_is_cleared_without_touching_the_data_register() {
    let board = Board::ready(Binding::SPI1);
    let (completion, count) = counting_completion();
    board.spi.set_completion(Some(completion));

    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.spi_regs.write(spi::SR, spi::RXNE | spi::OVR);
    board.spi_regs.write(spi::DR, 0x3C);
    board.complete();

    assert_eq!(board.spi_regs.read(spi::DR), 0x3C);
    assert_eq!(board.rx_ccr(), 0);
    assert_eq!(board.tx_ccr(), 0);
    assert!(!board.spi.dma_in_progress());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn transfer_error_still_completes() {
    let board = Board::ready(Binding::SPI2);
    let (completion, count) = counting_completion();
    board.spi.set_completion(Some(completion));

    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.fire(board.binding.tx_channel, dma::TEIF | dma::GIF);

    assert!(!board.spi.dma_in_progress());
    assert_eq!(board.tx_ccr(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn interrupt_without_a_callback_still_idles_the_bus() {
    let board = Board::ready(Binding::SPI3);
    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.complete();
    assert!(!board.spi.dma_in_progress());
}

#[test]
fn blocking_transfers_work_after_dma() {
    let board = Board::ready(Binding::SPI1);
    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.complete();
    assert_eq!(board.spi.transfer(0x81), 0x81);
}

#[test]
fn unregistered_channel_interrupt_is_ignored() {
    let board = Board::ready(Binding::SPI1);
    let (completion, count) = counting_completion();
    board.spi.set_completion(Some(completion));

    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), 4) };
    board.fire(6, dma::TCIF | dma::GIF);

    assert!(board.spi.dma_in_progress());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn channel_handles_read_back_an_armed_transfer() {
    let board = Board::ready(Binding::SPI2);
    let tx = [0xA5u8; 6];
    let mut rx = [0u8; 6];
    unsafe { board.spi.transfer_dma(tx.as_ptr(), rx.as_mut_ptr(), rx.len()) };

    let channel = unsafe { board.dma.channel(board.binding.rx_channel) };
    assert_eq!(channel.channel(), board.binding.rx_channel);
    assert!(channel.is_enabled());
    assert_eq!(channel.configuration(), board.rx_ccr());
    assert_eq!(channel.transfer_count(), 6);
    assert_eq!(channel.memory_address(), rx.as_ptr() as usize as u32);
    assert_eq!(channel.peripheral_address(), board.spi_regs.address_of(spi::DR));

    board.complete();
    assert!(!channel.is_enabled());
}

#[test]
fn handlers_see_half_transfer_flags() {
    static SEEN: AtomicU32 = AtomicU32::new(0);
    fn record(_: *const (), status: Status) {
        assert!(status.is_half());
        assert!(!status.is_complete());
        SEEN.store(status.raw(), Ordering::SeqCst);
    }

    let board = Board::ready(Binding::SPI1);
    let spare = unsafe { board.dma.channel(6) };
    spare.set_handler(Some(Handler::new(record, core::ptr::null())));
    board.fire(6, dma::HTIF | dma::GIF);

    assert_eq!(SEEN.load(Ordering::SeqCst), dma::HTIF | dma::GIF);
    assert_eq!(board.dma_regs.read(dma::IFCR), 0b1111 << 24);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn transfer_longer_than_the_count_register_is_rejected() {
    let board = Board::ready(Binding::SPI1);
    let buffer = [0u8; 4];
    unsafe { board.spi.tx_dma(buffer.as_ptr(), usize::from(u16::MAX) + 1) };
}
